use sea_orm_migration::prelude::*;
use sha2::Digest as _;

use crate::m20250701_000001_init::{SubscriptionPlan, User};

#[derive(DeriveMigrationName)]
pub struct Migration;

const SEED_TIME: &str = "2025-07-01T00:00:00.000Z";

const PLANS: [(&str, i64, i32, Option<i32>); 3] = [
    ("Basic", 10_000, 30, Some(25)),
    ("Premium", 15_000, 30, Some(100)),
    ("Enterprise", 25_000, 30, None),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let time = Expr::val(SEED_TIME).cast_as("timestamptz");

        // Bootstrap admin, password "admin"
        let hashed_password = &sha2::Sha256::digest("admin:admin")[..];

        manager
            .exec_stmt(Query::insert()
                .into_table(User::Table)
                .columns(["id", "created_at", "updated_at", "username", "email", "password", "role", "status"])
                .values_panic([
                    Expr::val(format!("{:032x}", 1u128)).cast_as("uuid"),
                    time.clone(),
                    time.clone(),
                    "admin".into(),
                    "admin@example.com".into(),
                    hashed_password.into(),
                    Expr::val("Admin").cast_as("role_type"),
                    Expr::val("active").cast_as("account_status"),
                ])
                .to_owned()
            ).await?;

        for (index, (name, price, duration_days, max_employees)) in PLANS.iter().enumerate() {
            manager
                .exec_stmt(Query::insert()
                    .into_table(SubscriptionPlan::Table)
                    .columns(["id", "created_at", "updated_at", "plan_name", "price", "duration_days", "max_employees", "is_active"])
                    .values_panic([
                        Expr::val(format!("{:032x}", 0x1000 + index as u128 + 1)).cast_as("uuid"),
                        time.clone(),
                        time.clone(),
                        (*name).into(),
                        (*price).into(),
                        (*duration_days).into(),
                        (*max_employees).into(),
                        true.into(),
                    ])
                    .to_owned()
                ).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in PLANS.iter().map(|(name, ..)| *name) {
            manager
                .exec_stmt(Query::delete()
                    .from_table(SubscriptionPlan::Table)
                    .and_where(Expr::col("plan_name").eq(name))
                    .to_owned()
                ).await?;
        }

        manager
            .exec_stmt(Query::delete()
                .from_table(User::Table)
                .and_where(Expr::col("username").eq("admin"))
                .to_owned()
            ).await?;

        Ok(())
    }
}
