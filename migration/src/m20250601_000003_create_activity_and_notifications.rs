use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create activity_logs table
        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActivityLogs::UserId).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::Action).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::Entity).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::EntityId).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::Details).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_user_id")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::UserId)
                    .to_owned(),
            )
            .await?;

        // Create notifications table
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notifications::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Notifications::Kind).string().not_null())
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).string().not_null())
                    .col(ColumnDef::new(Notifications::EntityType).string().not_null())
                    .col(ColumnDef::new(Notifications::EntityId).string())
                    .col(ColumnDef::new(Notifications::Status).string().not_null())
                    .col(ColumnDef::new(Notifications::Metadata).string())
                    .col(ColumnDef::new(Notifications::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Notifications::ReadAt).big_integer())
                    .col(ColumnDef::new(Notifications::DismissedAt).big_integer())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_kind_entity")
                    .table(Notifications::Table)
                    .col(Notifications::Kind)
                    .col(Notifications::EntityId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Notifications::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ActivityLogs::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(Iden)]
enum ActivityLogs {
    Table,
    Id,
    UserId,
    Action,
    Entity,
    EntityId,
    Details,
    CreatedAt,
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    Kind,
    Title,
    Message,
    EntityType,
    EntityId,
    Status,
    Metadata,
    CreatedAt,
    ReadAt,
    DismissedAt,
}
