use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::{Duration, Local};
use sea_orm::{
    ActiveValue::{Set, Unchanged},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::Admin,
    entity::{
        payment, prelude::*, subscription, subscription_plan, user,
        sea_orm_active_enums::{AccountStatus, PaymentStatus, SubscriptionStatus},
    },
    error::ApiError,
    services::{
        gateway::{self, MidtransClient, TransactionItem},
        invoice::{self, InvoiceData},
    },
};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(plans)
        .service(status)
        .service(create)
        .service(webhook)
        .service(admin_all)
        .service(billing_current)
        .service(invoice_view)
        .service(invoice_download);
}

#[derive(Debug, Serialize, Deserialize)]
struct CreateSubscription {
    plan_id: Uuid,
}

/// Webhook notification payload. Midtrans sends more fields; only the
/// signed quartet plus the status fields matter here.
#[derive(Debug, Serialize, Deserialize)]
struct PaymentNotification {
    order_id: String,
    status_code: String,
    gross_amount: String,
    signature_key: String,
    transaction_status: String,
    fraud_status: Option<String>,
    payment_type: Option<String>,
    transaction_id: Option<String>,
}

/// Billing counts employees whose account is active; pending and rejected
/// accounts are not seats.
fn active_employees() -> Select<Employee> {
    Employee::find()
        .inner_join(User)
        .filter(user::Column::Status.eq(AccountStatus::Active))
}

#[get("/plans")]
async fn plans(db: web::Data<DatabaseConnection>) -> Result<impl Responder, ApiError> {
    let rows = SubscriptionPlan::find()
        .filter(subscription_plan::Column::IsActive.eq(true))
        .order_by_asc(subscription_plan::Column::Price)
        .all(db.as_ref()).await?;

    Ok(web::Json(rows))
}

#[get("/status")]
async fn status(db: web::Data<DatabaseConnection>, admin: Admin) -> Result<impl Responder, ApiError> {
    let Some((subscription, plan)) = Subscription::find()
        .filter(subscription::Column::UserId.eq(admin.user_id))
        .find_also_related(SubscriptionPlan)
        .one(db.as_ref()).await?
    else {
        return Ok(web::Json(json!({ "subscribed": false })));
    };

    let latest_payment = Payment::find()
        .filter(payment::Column::SubscriptionId.eq(subscription.id))
        .order_by_desc(payment::Column::CreatedAt)
        .one(db.as_ref()).await?;

    Ok(web::Json(json!({
        "subscribed": subscription.status == SubscriptionStatus::Active,
        "subscription": subscription,
        "plan": plan,
        "latest_payment": latest_payment,
    })))
}

/// Starts a billing cycle: prices the plan against the current headcount,
/// opens a gateway transaction, and stores the pending payment.
#[post("/create")]
async fn create(
    db: web::Data<DatabaseConnection>,
    midtrans: web::Data<MidtransClient>,
    admin: Admin,
    payload: web::Json<CreateSubscription>,
) -> Result<HttpResponse, ApiError> {
    let Some(plan) = SubscriptionPlan::find_by_id(payload.plan_id).one(db.as_ref()).await? else {
        return Err(ApiError::not_found("Paket tidak ditemukan"));
    };
    if !plan.is_active {
        return Err(ApiError::bad_request("Paket ini sudah tidak tersedia"));
    }

    let employee_count = active_employees().all(db.as_ref()).await?.len() as i64;

    if let Some(max) = plan.max_employees {
        if employee_count > max as i64 {
            return Err(ApiError::bad_request(format!(
                "Paket {} maksimal {max} karyawan, saat ini {employee_count}",
                plan.plan_name
            )));
        }
    }

    let gross_amount = employee_count * plan.price;
    let now = Local::now().fixed_offset();

    let existing = Subscription::find()
        .filter(subscription::Column::UserId.eq(admin.user_id))
        .one(db.as_ref()).await?;

    let subscription = match existing {
        Some(subscription) => {
            Subscription::update(subscription::ActiveModel {
                id: Unchanged(subscription.id),
                updated_at: Set(now),
                plan_id: Set(plan.id),
                status: Set(SubscriptionStatus::Pending),
                ..Default::default()
            }).exec(db.as_ref()).await?
        }
        None => {
            Subscription::insert(subscription::ActiveModel {
                id: Set(Uuid::new_v4()),
                created_at: Set(now),
                updated_at: Set(now),
                user_id: Set(admin.user_id),
                plan_id: Set(plan.id),
                status: Set(SubscriptionStatus::Pending),
                start_date: Set(None),
                end_date: Set(None),
            }).exec_with_returning(db.as_ref()).await?
        }
    };

    let order_id = format!(
        "SUB-{}-{}",
        now.timestamp(),
        &Uuid::new_v4().simple().to_string()[..8]
    );

    let items = [TransactionItem {
        id: plan.id.to_string(),
        name: format!("{} ({employee_count} karyawan)", plan.plan_name),
        price: plan.price,
        quantity: employee_count,
    }];

    let snap = midtrans.create_transaction(
        &order_id,
        gross_amount,
        &admin.username,
        &admin.email,
        &items,
    ).await?;

    let metadata = json!({
        "employee_count": employee_count,
        "price_per_employee": plan.price,
        "plan_name": plan.plan_name,
    }).to_string();

    let payment = Payment::insert(payment::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        subscription_id: Set(subscription.id),
        order_id: Set(order_id.clone()),
        amount: Set(gross_amount),
        status: Set(PaymentStatus::Pending),
        payment_type: Set(None),
        transaction_id: Set(None),
        snap_token: Set(Some(snap.token.clone())),
        snap_url: Set(Some(snap.redirect_url.clone())),
        payment_date: Set(None),
        expired_at: Set(Some(now + Duration::hours(24))),
        metadata: Set(Some(metadata)),
    }).exec_with_returning(db.as_ref()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Transaksi pembayaran dibuat",
        "order_id": order_id,
        "gross_amount": gross_amount,
        "employee_count": employee_count,
        "snap_token": snap.token,
        "snap_url": snap.redirect_url,
        "payment": payment,
    })))
}

/// Gateway callback. Unauthenticated by nature; the signature check is the
/// only gate.
#[post("/webhook")]
async fn webhook(
    db: web::Data<DatabaseConnection>,
    midtrans: web::Data<MidtransClient>,
    payload: web::Json<PaymentNotification>,
) -> Result<impl Responder, ApiError> {
    let payload = payload.into_inner();

    if !midtrans.verify_signature(
        &payload.order_id,
        &payload.status_code,
        &payload.gross_amount,
        &payload.signature_key,
    ) {
        tracing::warn!(order_id = %payload.order_id, "webhook signature mismatch");
        return Err(ApiError::Unauthorized("signature tidak valid".to_string()));
    }

    let Some(payment) = Payment::find()
        .filter(payment::Column::OrderId.eq(payload.order_id.clone()))
        .one(db.as_ref()).await?
    else {
        return Err(ApiError::not_found("Pembayaran tidak ditemukan"));
    };

    let now = Local::now().fixed_offset();
    let fraud_status = payload.fraud_status.as_deref();

    if gateway::is_success(&payload.transaction_status, fraud_status) {
        Payment::update(payment::ActiveModel {
            id: Unchanged(payment.id),
            updated_at: Set(now),
            status: Set(PaymentStatus::Success),
            payment_type: Set(payload.payment_type),
            transaction_id: Set(payload.transaction_id),
            payment_date: Set(Some(now)),
            ..Default::default()
        }).exec(db.as_ref()).await?;

        let Some((subscription, plan)) = Subscription::find_by_id(payment.subscription_id)
            .find_also_related(SubscriptionPlan)
            .one(db.as_ref()).await?
        else {
            return Err(ApiError::not_found("Langganan tidak ditemukan"));
        };

        let duration_days = plan.map(|plan| plan.duration_days).unwrap_or(30);

        Subscription::update(subscription::ActiveModel {
            id: Unchanged(subscription.id),
            updated_at: Set(now),
            status: Set(SubscriptionStatus::Active),
            start_date: Set(Some(now)),
            end_date: Set(Some(now + Duration::days(duration_days as i64))),
            ..Default::default()
        }).exec(db.as_ref()).await?;

        tracing::info!(order_id = %payload.order_id, "subscription activated");
    } else if gateway::is_failed(&payload.transaction_status) {
        Payment::update(payment::ActiveModel {
            id: Unchanged(payment.id),
            updated_at: Set(now),
            status: Set(PaymentStatus::Failed),
            payment_type: Set(payload.payment_type),
            transaction_id: Set(payload.transaction_id),
            ..Default::default()
        }).exec(db.as_ref()).await?;

        Subscription::update(subscription::ActiveModel {
            id: Unchanged(payment.subscription_id),
            updated_at: Set(now),
            status: Set(SubscriptionStatus::Inactive),
            ..Default::default()
        }).exec(db.as_ref()).await?;

        tracing::info!(
            order_id = %payload.order_id,
            transaction_status = %payload.transaction_status,
            "payment failed",
        );
    } else if gateway::is_pending(&payload.transaction_status) {
        tracing::info!(order_id = %payload.order_id, "payment still pending");
    } else {
        tracing::warn!(
            order_id = %payload.order_id,
            transaction_status = %payload.transaction_status,
            "unrecognized transaction status, ignored",
        );
    }

    Ok(web::Json(json!({ "message": "OK" })))
}

#[get("/admin/all")]
async fn admin_all(db: web::Data<DatabaseConnection>, _admin: Admin) -> Result<impl Responder, ApiError> {
    let rows = Subscription::find()
        .find_also_related(SubscriptionPlan)
        .order_by_desc(subscription::Column::CreatedAt)
        .all(db.as_ref()).await?;

    let rows = rows.into_iter()
        .map(|(subscription, plan)| json!({ "subscription": subscription, "plan": plan }))
        .collect::<Vec<_>>();

    Ok(web::Json(rows))
}

/// What the next billing cycle would cost at today's headcount.
#[get("/billing/current")]
async fn billing_current(db: web::Data<DatabaseConnection>, admin: Admin) -> Result<impl Responder, ApiError> {
    let Some((subscription, plan)) = Subscription::find()
        .filter(subscription::Column::UserId.eq(admin.user_id))
        .find_also_related(SubscriptionPlan)
        .one(db.as_ref()).await?
    else {
        return Err(ApiError::not_found("Belum ada langganan"));
    };

    let Some(plan) = plan else {
        return Err(ApiError::not_found("Paket langganan tidak ditemukan"));
    };

    let employee_count = active_employees().all(db.as_ref()).await?.len() as i64;

    Ok(web::Json(json!({
        "subscription_status": subscription.status,
        "plan_name": plan.plan_name,
        "price_per_employee": plan.price,
        "employee_count": employee_count,
        "estimated_total": employee_count * plan.price,
        "end_date": subscription.end_date,
    })))
}

async fn build_invoice(
    db: &DatabaseConnection,
    admin: &crate::auth::TokenUser,
    payment_id: Uuid,
) -> Result<InvoiceData, ApiError> {
    let Some((payment, subscription)) = Payment::find_by_id(payment_id)
        .find_also_related(Subscription)
        .one(db).await?
    else {
        return Err(ApiError::not_found("Pembayaran tidak ditemukan"));
    };

    let Some(subscription) = subscription else {
        return Err(ApiError::not_found("Langganan tidak ditemukan"));
    };
    if subscription.user_id != admin.user_id {
        return Err(ApiError::forbidden("tidak boleh mengakses invoice langganan lain"));
    }

    let plan = SubscriptionPlan::find_by_id(subscription.plan_id).one(db).await?;

    let metadata: serde_json::Value = payment.metadata.as_deref()
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default();

    let plan_name = plan.map(|plan| plan.plan_name)
        .unwrap_or_else(|| metadata["plan_name"].as_str().unwrap_or("-").to_string());

    Ok(InvoiceData {
        order_id: payment.order_id,
        company_name: admin.username.clone(),
        plan_name,
        price_per_employee: metadata["price_per_employee"].as_i64().unwrap_or(0),
        employee_count: metadata["employee_count"].as_i64().unwrap_or(0),
        amount: payment.amount,
        status: format!("{:?}", payment.status).to_lowercase(),
        payment_date: payment.payment_date,
    })
}

#[get("/invoice/{payment_id}")]
async fn invoice_download(
    db: web::Data<DatabaseConnection>,
    admin: Admin,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let data = build_invoice(db.as_ref(), &admin, path.into_inner()).await?;
    let filename = format!("invoice-{}.pdf", data.order_id);

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(("Content-Disposition", format!("attachment; filename=\"{filename}\"")))
        .body(invoice::render_pdf(&data)))
}

#[get("/invoice/{payment_id}/view")]
async fn invoice_view(
    db: web::Data<DatabaseConnection>,
    admin: Admin,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let data = build_invoice(db.as_ref(), &admin, path.into_inner()).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(("Content-Disposition", "inline"))
        .body(invoice::render_pdf(&data)))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::{Method, StatusCode}, test, App};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::{
        auth::Authority,
        entity::{employee, user, sea_orm_active_enums::{AccountStatus, RoleType}},
    };

    use super::*;

    fn admin_token(authority: &Authority) -> (user::Model, String) {
        let account = user::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            username: "boss".to_string(),
            email: "boss@example.com".to_string(),
            password: Vec::new(),
            role: RoleType::Admin,
            status: AccountStatus::Active,
            reset_token: None,
            reset_token_expiry: None,
        };

        let token = authority.issue_for(&account, None);
        (account, token)
    }

    fn plan_row(price: i64) -> subscription_plan::Model {
        subscription_plan::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            plan_name: "Premium".to_string(),
            price,
            duration_days: 30,
            max_employees: None,
            is_active: true,
        }
    }

    fn employee_row() -> employee::Model {
        employee::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            user_id: Uuid::new_v4(),
            nama_lengkap: "Karyawan".to_string(),
            jenis_kelamin: None,
            alamat: None,
            no_hp: None,
            jabatan: None,
            status_karyawan: "Tetap".to_string(),
            gaji_pokok: 5_000_000,
            tanggal_masuk: Local::now().date_naive(),
        }
    }

    #[std::prelude::v1::test]
    fn test_headcount_only_counts_active_accounts() {
        use sea_orm::QueryTrait as _;

        let sql = active_employees().build(DatabaseBackend::Postgres).to_string();

        assert!(sql.contains(r#"INNER JOIN "user""#), "{sql}");
        assert!(sql.contains("active"), "{sql}");
    }

    #[actix_web::test]
    async fn test_webhook_rejects_bad_signature() {
        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(MidtransClient::new("SB-key".to_string(), false)))
                .app_data(web::Data::new(db.into_connection()))
                .service(webhook)
        ).await;

        let req = test::TestRequest::default()
            .uri("/webhook")
            .method(Method::POST)
            .set_json(PaymentNotification {
                order_id: "SUB-1-abcd".to_string(),
                status_code: "200".to_string(),
                gross_amount: "300000".to_string(),
                signature_key: "forged".to_string(),
                transaction_status: "settlement".to_string(),
                fraud_status: None,
                payment_type: Some("qris".to_string()),
                transaction_id: None,
            })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_billing_preview_multiplies_headcount() {
        let secret = b"secret";
        let authority = Authority::new(secret);
        let (account, token) = admin_token(&authority);

        let plan = plan_row(15_000);
        let subscription = subscription::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            user_id: account.id,
            plan_id: plan.id,
            status: SubscriptionStatus::Active,
            start_date: Some(Local::now().into()),
            end_date: None,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![(subscription, plan)]])
            .append_query_results([vec![employee_row(), employee_row(), employee_row()]]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(billing_current)
        ).await;

        let req = test::TestRequest::default()
            .uri("/billing/current")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["employee_count"], 3);
        assert_eq!(body["estimated_total"], 45_000);
    }

    #[actix_web::test]
    async fn test_create_rejects_inactive_plan() {
        let secret = b"secret";
        let authority = Authority::new(secret);
        let (_, token) = admin_token(&authority);

        let mut plan = plan_row(15_000);
        plan.is_active = false;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![plan.clone()]]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(MidtransClient::new("SB-key".to_string(), false)))
                .app_data(web::Data::new(db.into_connection()))
                .service(create)
        ).await;

        let req = test::TestRequest::default()
            .uri("/create")
            .method(Method::POST)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(CreateSubscription { plan_id: plan.id })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
