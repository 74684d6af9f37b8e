use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create fitness_goals table
        manager
            .create_table(
                Table::create()
                    .table(FitnessGoals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FitnessGoals::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(FitnessGoals::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(FitnessGoals::Description).string())
                    .col(ColumnDef::new(FitnessGoals::IsDefault).boolean().not_null().default(false))
                    .col(ColumnDef::new(FitnessGoals::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create exercises table
        manager
            .create_table(
                Table::create()
                    .table(Exercises::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Exercises::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Exercises::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Exercises::Category).string().not_null())
                    .col(ColumnDef::new(Exercises::Equipment).string().not_null())
                    .col(ColumnDef::new(Exercises::Difficulty).string().not_null())
                    .col(ColumnDef::new(Exercises::IsDefault).boolean().not_null().default(false))
                    .col(ColumnDef::new(Exercises::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create diet_types table
        manager
            .create_table(
                Table::create()
                    .table(DietTypes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DietTypes::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(DietTypes::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(DietTypes::Description).string())
                    .col(ColumnDef::new(DietTypes::IsDefault).boolean().not_null().default(false))
                    .col(ColumnDef::new(DietTypes::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create workout_plans table
        manager
            .create_table(
                Table::create()
                    .table(WorkoutPlans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WorkoutPlans::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(WorkoutPlans::MemberId).string().not_null())
                    .col(ColumnDef::new(WorkoutPlans::Name).string().not_null())
                    .col(ColumnDef::new(WorkoutPlans::Description).string())
                    .col(ColumnDef::new(WorkoutPlans::Exercises).string().not_null().default("[]"))
                    .col(ColumnDef::new(WorkoutPlans::Difficulty).string())
                    .col(ColumnDef::new(WorkoutPlans::GoalId).string())
                    .col(ColumnDef::new(WorkoutPlans::StartDate).big_integer())
                    .col(ColumnDef::new(WorkoutPlans::EndDate).big_integer())
                    .col(ColumnDef::new(WorkoutPlans::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(WorkoutPlans::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workout_plans_member_id")
                            .from(WorkoutPlans::Table, WorkoutPlans::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workout_plans_goal_id")
                            .from(WorkoutPlans::Table, WorkoutPlans::GoalId)
                            .to(FitnessGoals::Table, FitnessGoals::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workout_plans_member_id")
                    .table(WorkoutPlans::Table)
                    .col(WorkoutPlans::MemberId)
                    .to_owned(),
            )
            .await?;

        // Create diet_plans table
        manager
            .create_table(
                Table::create()
                    .table(DietPlans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DietPlans::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(DietPlans::MemberId).string().not_null())
                    .col(ColumnDef::new(DietPlans::Name).string().not_null())
                    .col(ColumnDef::new(DietPlans::Description).string())
                    .col(ColumnDef::new(DietPlans::DietTypeId).string())
                    .col(ColumnDef::new(DietPlans::Meals).string().not_null().default("[]"))
                    .col(ColumnDef::new(DietPlans::TotalCalories).integer())
                    .col(ColumnDef::new(DietPlans::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(DietPlans::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_diet_plans_member_id")
                            .from(DietPlans::Table, DietPlans::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_diet_plans_diet_type_id")
                            .from(DietPlans::Table, DietPlans::DietTypeId)
                            .to(DietTypes::Table, DietTypes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_diet_plans_member_id")
                    .table(DietPlans::Table)
                    .col(DietPlans::MemberId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(DietPlans::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(WorkoutPlans::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(DietTypes::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Exercises::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FitnessGoals::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(Iden)]
enum FitnessGoals {
    Table,
    Id,
    Name,
    Description,
    IsDefault,
    CreatedAt,
}

#[derive(Iden)]
enum Exercises {
    Table,
    Id,
    Name,
    Category,
    Equipment,
    Difficulty,
    IsDefault,
    CreatedAt,
}

#[derive(Iden)]
enum DietTypes {
    Table,
    Id,
    Name,
    Description,
    IsDefault,
    CreatedAt,
}

#[derive(Iden)]
enum WorkoutPlans {
    Table,
    Id,
    MemberId,
    Name,
    Description,
    Exercises,
    Difficulty,
    GoalId,
    StartDate,
    EndDate,
    Active,
    CreatedAt,
}

#[derive(Iden)]
enum DietPlans {
    Table,
    Id,
    MemberId,
    Name,
    Description,
    DietTypeId,
    Meals,
    TotalCalories,
    Active,
    CreatedAt,
}

#[derive(Iden)]
enum Members {
    Table,
    Id,
}
