use sea_orm_migration::{
    prelude::{extension::postgres::TypeDropStatement, *},
    sea_orm::{ActiveEnum, DbBackend, DeriveActiveEnum, EnumIter, Schema},
};

use crate::util::{audit_fk, default_table_statement, owned_fk};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(DbBackend::Postgres);

        manager.create_type(schema.create_enum_from_active_enum::<RoleType>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<AccountStatus>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<AttendanceStatus>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<ApprovalStatus>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<WorkType>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<LeaveType>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<SubscriptionStatus>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<PaymentStatus>()).await?;

        manager
            .create_table(default_table_statement()
                .table(User::Table)
                .col(ColumnDef::new(User::Username)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(User::Email)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(User::Password)
                    .binary()
                    .not_null()) // Hashed; empty until the account sets one
                .col(ColumnDef::new(User::Role)
                    .custom(RoleType::name())
                    .not_null())
                .col(ColumnDef::new(User::Status)
                    .custom(AccountStatus::name())
                    .not_null())
                .col(ColumnDef::new(User::ResetToken)
                    .text())
                .col(ColumnDef::new(User::ResetTokenExpiry)
                    .timestamp_with_time_zone())
                .take()
            ).await?;

        manager
            .create_table(default_table_statement()
                .table(Employee::Table)
                .col(ColumnDef::new(Employee::UserId)
                    .uuid()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(Employee::NamaLengkap)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Employee::JenisKelamin).text())
                .col(ColumnDef::new(Employee::Alamat).text())
                .col(ColumnDef::new(Employee::NoHp).text())
                .col(ColumnDef::new(Employee::Jabatan).text())
                .col(ColumnDef::new(Employee::StatusKaryawan)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Employee::GajiPokok)
                    .big_integer()
                    .not_null()) // Rupiah; PostgreSQL has no unsigned big int
                .col(ColumnDef::new(Employee::TanggalMasuk)
                    .date()
                    .not_null())
                .take()
            ).await?;
        manager.create_foreign_key(owned_fk(Employee::Table, Employee::UserId, User::Table)).await?;

        manager
            .create_table(default_table_statement()
                .table(WorkSchedule::Table)
                .col(ColumnDef::new(WorkSchedule::ScheduleName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(WorkSchedule::ShiftType)
                    .text()
                    .not_null())
                .col(ColumnDef::new(WorkSchedule::StartTime)
                    .text()
                    .not_null())
                .col(ColumnDef::new(WorkSchedule::EndTime)
                    .text()
                    .not_null())
                .col(ColumnDef::new(WorkSchedule::BreakDuration)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(WorkSchedule::WorkDays)
                    .text()
                    .not_null())
                .col(ColumnDef::new(WorkSchedule::IsActive)
                    .boolean()
                    .not_null()
                    .default(true))
                .take()
            ).await?;

        manager
            .create_table(default_table_statement()
                .table(EmployeeSchedule::Table)
                .col(ColumnDef::new(EmployeeSchedule::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(EmployeeSchedule::ScheduleId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(EmployeeSchedule::EffectiveDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(EmployeeSchedule::EndDate).date())
                .col(ColumnDef::new(EmployeeSchedule::Notes).text())
                .col(ColumnDef::new(EmployeeSchedule::IsActive)
                    .boolean()
                    .not_null()
                    .default(true))
                .take()
            ).await?;
        manager.create_foreign_key(owned_fk(EmployeeSchedule::Table, EmployeeSchedule::EmployeeId, Employee::Table)).await?;
        manager.create_foreign_key(owned_fk(EmployeeSchedule::Table, EmployeeSchedule::ScheduleId, WorkSchedule::Table)).await?;

        manager
            .create_table(default_table_statement()
                .table(Attendance::Table)
                .col(ColumnDef::new(Attendance::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Attendance::Tanggal)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Attendance::JamMasuk).text())
                .col(ColumnDef::new(Attendance::JamPulang).text())
                .col(ColumnDef::new(Attendance::Status)
                    .custom(AttendanceStatus::name()))
                .col(ColumnDef::new(Attendance::TipeKerja)
                    .custom(WorkType::name())
                    .not_null())
                .col(ColumnDef::new(Attendance::Keterangan).text())
                .col(ColumnDef::new(Attendance::LokasiMasuk).text())
                .col(ColumnDef::new(Attendance::LokasiPulang).text())
                .col(ColumnDef::new(Attendance::AkurasiMasuk).integer())
                .col(ColumnDef::new(Attendance::AkurasiPulang).integer())
                .col(ColumnDef::new(Attendance::ApprovalStatus)
                    .custom(ApprovalStatus::name()))
                .col(ColumnDef::new(Attendance::ApprovedBy).uuid())
                .col(ColumnDef::new(Attendance::ApprovalNotes).text())
                .col(ColumnDef::new(Attendance::ApprovalDate)
                    .timestamp_with_time_zone())
                .col(ColumnDef::new(Attendance::RecordedByRole).text())
                .take()
            ).await?;
        manager.create_foreign_key(owned_fk(Attendance::Table, Attendance::EmployeeId, Employee::Table)).await?;
        manager.create_foreign_key(audit_fk(Attendance::Table, Attendance::ApprovedBy, User::Table)).await?;

        // One attendance row per employee per day
        manager
            .create_index(Index::create()
                .name("idx_attendance_employee_tanggal")
                .table(Attendance::Table)
                .col(Attendance::EmployeeId)
                .col(Attendance::Tanggal)
                .unique()
                .take()
            ).await?;

        manager
            .create_table(default_table_statement()
                .table(LeaveRequest::Table)
                .col(ColumnDef::new(LeaveRequest::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(LeaveRequest::TanggalPengajuan)
                    .date()
                    .not_null())
                .col(ColumnDef::new(LeaveRequest::TanggalMulai)
                    .date()
                    .not_null())
                .col(ColumnDef::new(LeaveRequest::TanggalSelesai)
                    .date()
                    .not_null())
                .col(ColumnDef::new(LeaveRequest::JenisPengajuan)
                    .custom(LeaveType::name())
                    .not_null())
                .col(ColumnDef::new(LeaveRequest::Alasan)
                    .text()
                    .not_null())
                .col(ColumnDef::new(LeaveRequest::Status)
                    .custom(ApprovalStatus::name())
                    .not_null())
                .col(ColumnDef::new(LeaveRequest::ApprovedBy).uuid())
                .col(ColumnDef::new(LeaveRequest::ApprovalNotes).text())
                .col(ColumnDef::new(LeaveRequest::ApprovalDate)
                    .timestamp_with_time_zone())
                .take()
            ).await?;
        manager.create_foreign_key(owned_fk(LeaveRequest::Table, LeaveRequest::EmployeeId, Employee::Table)).await?;
        manager.create_foreign_key(audit_fk(LeaveRequest::Table, LeaveRequest::ApprovedBy, User::Table)).await?;

        manager
            .create_table(default_table_statement()
                .table(Overtime::Table)
                .col(ColumnDef::new(Overtime::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Overtime::AttendanceId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Overtime::Tanggal)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Overtime::JamCheckout)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Overtime::JamScheduled)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Overtime::OvertimeHours)
                    .double()
                    .not_null())
                .col(ColumnDef::new(Overtime::BonusPerHour)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Overtime::TotalBonus)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Overtime::Status)
                    .custom(ApprovalStatus::name())
                    .not_null())
                .col(ColumnDef::new(Overtime::Reason)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Overtime::ApprovedBy).uuid())
                .col(ColumnDef::new(Overtime::ApprovalNotes).text())
                .col(ColumnDef::new(Overtime::ApprovalDate)
                    .timestamp_with_time_zone())
                .take()
            ).await?;
        manager.create_foreign_key(owned_fk(Overtime::Table, Overtime::EmployeeId, Employee::Table)).await?;
        manager.create_foreign_key(owned_fk(Overtime::Table, Overtime::AttendanceId, Attendance::Table)).await?;
        manager.create_foreign_key(audit_fk(Overtime::Table, Overtime::ApprovedBy, User::Table)).await?;

        manager
            .create_table(default_table_statement()
                .table(Payroll::Table)
                .col(ColumnDef::new(Payroll::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Payroll::Periode)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Payroll::GajiPokok)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::Tunjangan)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::Potongan)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::AlasanPotongan)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Payroll::TotalGaji)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::EmployeeRole)
                    .text()
                    .not_null())
                .take()
            ).await?;
        manager.create_foreign_key(owned_fk(Payroll::Table, Payroll::EmployeeId, Employee::Table)).await?;

        // One statement per employee per period
        manager
            .create_index(Index::create()
                .name("idx_payroll_employee_periode")
                .table(Payroll::Table)
                .col(Payroll::EmployeeId)
                .col(Payroll::Periode)
                .unique()
                .take()
            ).await?;

        manager
            .create_table(default_table_statement()
                .table(SubscriptionPlan::Table)
                .col(ColumnDef::new(SubscriptionPlan::PlanName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(SubscriptionPlan::Price)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(SubscriptionPlan::DurationDays)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(SubscriptionPlan::MaxEmployees).integer())
                .col(ColumnDef::new(SubscriptionPlan::IsActive)
                    .boolean()
                    .not_null()
                    .default(true))
                .take()
            ).await?;

        manager
            .create_table(default_table_statement()
                .table(Subscription::Table)
                .col(ColumnDef::new(Subscription::UserId)
                    .uuid()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(Subscription::PlanId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Subscription::Status)
                    .custom(SubscriptionStatus::name())
                    .not_null())
                .col(ColumnDef::new(Subscription::StartDate)
                    .timestamp_with_time_zone())
                .col(ColumnDef::new(Subscription::EndDate)
                    .timestamp_with_time_zone())
                .take()
            ).await?;
        manager.create_foreign_key(owned_fk(Subscription::Table, Subscription::UserId, User::Table)).await?;
        manager.create_foreign_key(owned_fk(Subscription::Table, Subscription::PlanId, SubscriptionPlan::Table)).await?;

        manager
            .create_table(default_table_statement()
                .table(Payment::Table)
                .col(ColumnDef::new(Payment::SubscriptionId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Payment::OrderId)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(Payment::Amount)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payment::Status)
                    .custom(PaymentStatus::name())
                    .not_null())
                .col(ColumnDef::new(Payment::PaymentType).text())
                .col(ColumnDef::new(Payment::TransactionId).text())
                .col(ColumnDef::new(Payment::SnapToken).text())
                .col(ColumnDef::new(Payment::SnapUrl).text())
                .col(ColumnDef::new(Payment::PaymentDate)
                    .timestamp_with_time_zone())
                .col(ColumnDef::new(Payment::ExpiredAt)
                    .timestamp_with_time_zone())
                .col(ColumnDef::new(Payment::Metadata).text())
                .take()
            ).await?;
        manager.create_foreign_key(owned_fk(Payment::Table, Payment::SubscriptionId, Subscription::Table)).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(TableDropStatement::new().table(Payment::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(Subscription::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(SubscriptionPlan::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(Payroll::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(Overtime::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(LeaveRequest::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(Attendance::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(EmployeeSchedule::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(WorkSchedule::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(Employee::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(User::Table).take()).await?;

        for name in [
            PaymentStatus::name(),
            SubscriptionStatus::name(),
            LeaveType::name(),
            WorkType::name(),
            ApprovalStatus::name(),
            AttendanceStatus::name(),
            AccountStatus::name(),
            RoleType::name(),
        ] {
            manager.drop_type(TypeDropStatement::new().name(name).to_owned()).await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum User {
    Table,
    Username,
    Email,
    Password,
    Role,
    Status,
    ResetToken,
    ResetTokenExpiry,
}

#[derive(Iden)]
pub(crate) enum Employee {
    Table,
    UserId,
    NamaLengkap,
    JenisKelamin,
    Alamat,
    NoHp,
    Jabatan,
    StatusKaryawan,
    GajiPokok,
    TanggalMasuk,
}

#[derive(Iden)]
enum WorkSchedule {
    Table,
    ScheduleName,
    ShiftType,
    StartTime,
    EndTime,
    BreakDuration,
    WorkDays,
    IsActive,
}

#[derive(Iden)]
enum EmployeeSchedule {
    Table,
    EmployeeId,
    ScheduleId,
    EffectiveDate,
    EndDate,
    Notes,
    IsActive,
}

#[derive(Iden)]
enum Attendance {
    Table,
    EmployeeId,
    Tanggal,
    JamMasuk,
    JamPulang,
    Status,
    TipeKerja,
    Keterangan,
    LokasiMasuk,
    LokasiPulang,
    AkurasiMasuk,
    AkurasiPulang,
    ApprovalStatus,
    ApprovedBy,
    ApprovalNotes,
    ApprovalDate,
    RecordedByRole,
}

#[derive(Iden)]
enum LeaveRequest {
    Table,
    EmployeeId,
    TanggalPengajuan,
    TanggalMulai,
    TanggalSelesai,
    JenisPengajuan,
    Alasan,
    Status,
    ApprovedBy,
    ApprovalNotes,
    ApprovalDate,
}

#[derive(Iden)]
enum Overtime {
    Table,
    EmployeeId,
    AttendanceId,
    Tanggal,
    JamCheckout,
    JamScheduled,
    OvertimeHours,
    BonusPerHour,
    TotalBonus,
    Status,
    Reason,
    ApprovedBy,
    ApprovalNotes,
    ApprovalDate,
}

#[derive(Iden)]
enum Payroll {
    Table,
    EmployeeId,
    Periode,
    GajiPokok,
    Tunjangan,
    Potongan,
    AlasanPotongan,
    TotalGaji,
    EmployeeRole,
}

#[derive(Iden)]
pub(crate) enum SubscriptionPlan {
    Table,
    PlanName,
    Price,
    DurationDays,
    MaxEmployees,
    IsActive,
}

#[derive(Iden)]
enum Subscription {
    Table,
    UserId,
    PlanId,
    Status,
    StartDate,
    EndDate,
}

#[derive(Iden)]
enum Payment {
    Table,
    SubscriptionId,
    OrderId,
    Amount,
    Status,
    PaymentType,
    TransactionId,
    SnapToken,
    SnapUrl,
    PaymentDate,
    ExpiredAt,
    Metadata,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role_type")]
enum RoleType {
    #[sea_orm(string_value = "Admin")]
    Admin,
    #[sea_orm(string_value = "HR")]
    Hr,
    #[sea_orm(string_value = "Karyawan")]
    Karyawan,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_status")]
enum AccountStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
enum AttendanceStatus {
    #[sea_orm(string_value = "hadir")]
    Hadir,
    #[sea_orm(string_value = "terlambat")]
    Terlambat,
    #[sea_orm(string_value = "alpa")]
    Alpa,
    #[sea_orm(string_value = "izin")]
    Izin,
    #[sea_orm(string_value = "sakit")]
    Sakit,
    #[sea_orm(string_value = "pending_approval")]
    PendingApproval,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "approval_status")]
enum ApprovalStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "work_type")]
enum WorkType {
    #[sea_orm(string_value = "WFO")]
    Wfo,
    #[sea_orm(string_value = "WFH")]
    Wfh,
    #[sea_orm(string_value = "Hybrid")]
    Hybrid,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "leave_type")]
enum LeaveType {
    #[sea_orm(string_value = "cuti")]
    Cuti,
    #[sea_orm(string_value = "izin")]
    Izin,
    #[sea_orm(string_value = "sakit")]
    Sakit,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "subscription_status")]
enum SubscriptionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "success")]
    Success,
    #[sea_orm(string_value = "failed")]
    Failed,
}
