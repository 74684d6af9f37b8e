use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table (staff and trainers)
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Permissions).string().not_null().default("[]"))
                    .col(ColumnDef::new(Users::Phone).string())
                    .col(ColumnDef::new(Users::Avatar).string())
                    .col(ColumnDef::new(Users::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Users::LastLogin).big_integer())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create leads table
        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Leads::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Leads::Name).string().not_null())
                    .col(ColumnDef::new(Leads::Phone).string().not_null())
                    .col(ColumnDef::new(Leads::Email).string())
                    .col(ColumnDef::new(Leads::Source).string().not_null())
                    .col(ColumnDef::new(Leads::Status).string().not_null())
                    .col(ColumnDef::new(Leads::InterestedPlan).string())
                    .col(ColumnDef::new(Leads::Notes).string())
                    .col(ColumnDef::new(Leads::FollowUpDate).big_integer())
                    .col(ColumnDef::new(Leads::LastContactDate).big_integer())
                    .col(ColumnDef::new(Leads::ConvertedDate).big_integer())
                    .col(ColumnDef::new(Leads::AssignedTo).string().not_null())
                    .col(ColumnDef::new(Leads::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Leads::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leads_status")
                    .table(Leads::Table)
                    .col(Leads::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leads_follow_up_date")
                    .table(Leads::Table)
                    .col(Leads::FollowUpDate)
                    .to_owned(),
            )
            .await?;

        // Create members table
        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Members::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Members::MembershipNumber).string().not_null().unique_key())
                    .col(ColumnDef::new(Members::Name).string().not_null())
                    .col(ColumnDef::new(Members::Phone).string().not_null())
                    .col(ColumnDef::new(Members::Email).string())
                    .col(ColumnDef::new(Members::Address).string())
                    .col(ColumnDef::new(Members::City).string())
                    .col(ColumnDef::new(Members::State).string())
                    .col(ColumnDef::new(Members::Pincode).string())
                    .col(ColumnDef::new(Members::DateOfBirth).big_integer())
                    .col(ColumnDef::new(Members::Gender).string())
                    .col(ColumnDef::new(Members::EmergencyName).string())
                    .col(ColumnDef::new(Members::EmergencyContact).string())
                    .col(ColumnDef::new(Members::BloodGroup).string())
                    .col(ColumnDef::new(Members::MedicalConditions).string())
                    .col(ColumnDef::new(Members::TrainerId).string())
                    .col(ColumnDef::new(Members::Status).string().not_null())
                    .col(ColumnDef::new(Members::Notes).string())
                    .col(ColumnDef::new(Members::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Members::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_members_trainer_id")
                            .from(Members::Table, Members::TrainerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_members_status")
                    .table(Members::Table)
                    .col(Members::Status)
                    .to_owned(),
            )
            .await?;

        // Create membership_plans table
        manager
            .create_table(
                Table::create()
                    .table(MembershipPlans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MembershipPlans::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(MembershipPlans::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(MembershipPlans::Description).string())
                    .col(ColumnDef::new(MembershipPlans::DurationDays).integer().not_null())
                    .col(ColumnDef::new(MembershipPlans::Price).big_integer().not_null())
                    .col(ColumnDef::new(MembershipPlans::Features).string().not_null().default("[]"))
                    .col(ColumnDef::new(MembershipPlans::Color).string())
                    .col(ColumnDef::new(MembershipPlans::Popular).boolean().not_null().default(false))
                    .col(ColumnDef::new(MembershipPlans::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(MembershipPlans::SortOrder).integer().not_null().default(0))
                    .col(ColumnDef::new(MembershipPlans::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create memberships table
        manager
            .create_table(
                Table::create()
                    .table(Memberships::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Memberships::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Memberships::MemberId).string().not_null())
                    .col(ColumnDef::new(Memberships::PlanId).string().not_null())
                    .col(ColumnDef::new(Memberships::StartDate).big_integer().not_null())
                    .col(ColumnDef::new(Memberships::EndDate).big_integer().not_null())
                    .col(ColumnDef::new(Memberships::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Memberships::Discount).big_integer())
                    .col(ColumnDef::new(Memberships::DiscountType).string())
                    .col(ColumnDef::new(Memberships::FinalAmount).big_integer().not_null())
                    .col(ColumnDef::new(Memberships::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Memberships::Notes).string())
                    .col(ColumnDef::new(Memberships::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_memberships_member_id")
                            .from(Memberships::Table, Memberships::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_memberships_plan_id")
                            .from(Memberships::Table, Memberships::PlanId)
                            .to(MembershipPlans::Table, MembershipPlans::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_memberships_member_id")
                    .table(Memberships::Table)
                    .col(Memberships::MemberId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_memberships_end_date")
                    .table(Memberships::Table)
                    .col(Memberships::EndDate)
                    .to_owned(),
            )
            .await?;

        // Create payments table
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Payments::MemberId).string().not_null())
                    .col(ColumnDef::new(Payments::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Payments::PaymentMode).string().not_null())
                    .col(ColumnDef::new(Payments::TransactionId).string())
                    .col(ColumnDef::new(Payments::InvoiceNumber).string().not_null().unique_key())
                    .col(ColumnDef::new(Payments::GstNumber).string())
                    .col(ColumnDef::new(Payments::GstPercentage).integer())
                    .col(ColumnDef::new(Payments::GstAmount).big_integer())
                    .col(ColumnDef::new(Payments::Notes).string())
                    .col(ColumnDef::new(Payments::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Payments::PaymentDate).big_integer().not_null())
                    .col(ColumnDef::new(Payments::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_member_id")
                            .from(Payments::Table, Payments::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_payment_date")
                    .table(Payments::Table)
                    .col(Payments::PaymentDate)
                    .to_owned(),
            )
            .await?;

        // Create attendance table, one row per member per day
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Attendance::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Attendance::MemberId).string().not_null())
                    .col(ColumnDef::new(Attendance::Date).big_integer().not_null())
                    .col(ColumnDef::new(Attendance::CheckIn).big_integer().not_null())
                    .col(ColumnDef::new(Attendance::CheckOut).big_integer())
                    .col(ColumnDef::new(Attendance::DurationMinutes).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_member_id")
                            .from(Attendance::Table, Attendance::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_member_date")
                    .table(Attendance::Table)
                    .col(Attendance::MemberId)
                    .col(Attendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Attendance::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Payments::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Memberships::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MembershipPlans::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Members::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Leads::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    Permissions,
    Phone,
    Avatar,
    Active,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Leads {
    Table,
    Id,
    Name,
    Phone,
    Email,
    Source,
    Status,
    InterestedPlan,
    Notes,
    FollowUpDate,
    LastContactDate,
    ConvertedDate,
    AssignedTo,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Members {
    Table,
    Id,
    MembershipNumber,
    Name,
    Phone,
    Email,
    Address,
    City,
    State,
    Pincode,
    DateOfBirth,
    Gender,
    EmergencyName,
    EmergencyContact,
    BloodGroup,
    MedicalConditions,
    TrainerId,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum MembershipPlans {
    Table,
    Id,
    Name,
    Description,
    DurationDays,
    Price,
    Features,
    Color,
    Popular,
    Active,
    SortOrder,
    CreatedAt,
}

#[derive(Iden)]
enum Memberships {
    Table,
    Id,
    MemberId,
    PlanId,
    StartDate,
    EndDate,
    Amount,
    Discount,
    DiscountType,
    FinalAmount,
    Active,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    MemberId,
    Amount,
    PaymentMode,
    TransactionId,
    InvoiceNumber,
    GstNumber,
    GstPercentage,
    GstAmount,
    Notes,
    CreatedBy,
    PaymentDate,
    CreatedAt,
}

#[derive(Iden)]
enum Attendance {
    Table,
    Id,
    MemberId,
    Date,
    CheckIn,
    CheckOut,
    DurationMinutes,
}
