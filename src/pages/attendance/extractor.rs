use std::ops::Deref;

use super::*;

impl FromRequest for attendance::Model {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let attendance_id = req.match_info().get("attendance_id").expect("This extractor must be used under `attendance_id` path");
            let Ok(attendance_id) = Uuid::from_str(attendance_id) else {
                return Err(ApiError::bad_request("attendance_id tidak valid").into())
            };

            let db = req.app_data::<web::Data<DatabaseConnection>>().expect("DatabaseConnection must be attached");

            let Some(attendance) = Attendance::find_by_id(attendance_id)
                .one(db.as_ref()).await.map_err(ApiError::from)?
            else {
                return Err(ApiError::not_found("Data absensi tidak ditemukan").into())
            };

            Ok(attendance)
        })
    }
}

/// A remote-work request still awaiting its one-shot approval decision.
pub(super) struct PendingRequest(pub(super) attendance::Model);

impl Deref for PendingRequest {
    type Target = attendance::Model;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for PendingRequest {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let attendance = attendance::Model::from_request(&req, &mut dev::Payload::None).await?;

            match attendance.approval_status {
                Some(ApprovalStatus::Pending) => Ok(Self(attendance)),
                Some(status) => Err(ApiError::Conflict(format!("Request ini sudah {status:?}").to_lowercase()).into()),
                None => Err(ApiError::bad_request("Absensi ini bukan request yang perlu approval").into()),
            }
        })
    }
}
