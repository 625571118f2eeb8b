//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every handler here awaits the database or the order feed, and
//! must stay that way: no blocking I/O in handlers.
use actix_web::{get, web, HttpResponse, Responder};
use formation_engine::{
    db_types::RequestId,
    FormationDatabase,
    OrderFeed,
    ReconciliationApi,
    RequestApi,
    StatusFlowApi,
};
use log::*;

use crate::{
    data_objects::{
        CheckoutParams,
        DocumentUploadParams,
        NewRequestParams,
        ReconcileParams,
        ReconcileResponse,
        StatusOverrideParams,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! {
            pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >(
                $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+
            );
        }
        paste::paste! {
            impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self {
                    Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
                }
            }
        }
        paste::paste! {
            impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory
                for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
            where
                $([<T $bounds:camel>]: $bounds + 'static,)+
            {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name::< $( [< T $bounds:camel >], )+>);
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Requests  ----------------------------------------------------
route!(create_request => Post "/requests" impl FormationDatabase);
/// Registers a new formation request in `pending_payment`.
///
/// This is called by the storefront integration when the customer submits the formation form, before they are sent to
/// the checkout. The body is a [`NewRequestParams`] object. Returns `201 Created` with the stored request, or
/// `409 Conflict` if a request with the same id already exists.
pub async fn create_request<B: FormationDatabase>(
    body: web::Json<NewRequestParams>,
    api: web::Data<RequestApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let params = body.into_inner();
    debug!("💻️ New formation request {} for {}", params.id, params.company_name);
    let request = api.create_request(params.into()).await.map_err(|e| {
        debug!("💻️ Could not create formation request. {e}");
        e
    })?;
    Ok(HttpResponse::Created().json(request))
}

route!(fetch_request => Get "/requests/{id}" impl FormationDatabase);
pub async fn fetch_request<B: FormationDatabase>(
    path: web::Path<String>,
    api: web::Data<RequestApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = RequestId::from(path.into_inner());
    trace!("💻️ Fetch request for {id}");
    let request = api.fetch_request(&id).await?;
    Ok(HttpResponse::Ok().json(request))
}

route!(record_checkout => Post "/requests/{id}/checkout" impl FormationDatabase);
/// Remembers which storefront cart the customer was sent to. The cart id is only ever used as a hint when looking for
/// the matching order; it is not evidence of payment.
pub async fn record_checkout<B: FormationDatabase>(
    path: web::Path<String>,
    body: web::Json<CheckoutParams>,
    api: web::Data<RequestApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = RequestId::from(path.into_inner());
    let params = body.into_inner();
    debug!("💻️ Checkout started for {id} with cart {}", params.cart_id);
    let request = api.record_checkout_session(&id, params.into()).await?;
    Ok(HttpResponse::Ok().json(request))
}

route!(reconcile => Post "/requests/{id}/reconcile" impl FormationDatabase, OrderFeed);
/// Looks for the order that pays for the request, records it if it is paid, and brings the status up to date.
///
/// Safe to call repeatedly. Clients typically poll this after the customer returns from the checkout.
///
/// ## Query parameters
/// * `payment_attempted` - optional. The client's own "payment attempted" marker. If supplied, the response carries
///   `clearPaymentAttempted`, telling the client whether it may drop the marker. It has no effect on matching.
///
/// ## Returns
/// A [`ReconcileResponse`]. "No order yet" and "order found but not paid" are successful responses.
/// Errors: `404` unknown request, `500` order feed not configured, `502` order feed unreachable.
pub async fn reconcile<B, F>(
    path: web::Path<String>,
    query: web::Query<ReconcileParams>,
    api: web::Data<ReconciliationApi<B, F>>,
) -> Result<HttpResponse, ServerError>
where
    B: FormationDatabase,
    F: OrderFeed,
{
    let id = RequestId::from(path.into_inner());
    let params = query.into_inner();
    debug!("💻️ Reconcile request for {id}");
    let result = api.reconcile(&id).await.map_err(|e| {
        warn!("💻️ Reconciliation for {id} failed. {e}");
        e
    })?;
    Ok(HttpResponse::Ok().json(ReconcileResponse::new(result, &params)))
}

route!(upload_document => Post "/requests/{id}/documents" impl FormationDatabase);
/// Records that a document was uploaded (the file itself lives elsewhere) and refreshes the request status.
///
/// This is how a paid request reaches `in_review` once the last required document arrives.
pub async fn upload_document<B: FormationDatabase>(
    path: web::Path<String>,
    body: web::Json<DocumentUploadParams>,
    api: web::Data<StatusFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = RequestId::from(path.into_inner());
    let DocumentUploadParams { document_type, file_name } = body.into_inner();
    debug!("💻️ {document_type} document uploaded for {id}");
    let result = api.record_document_upload(&id, document_type, file_name).await?;
    Ok(HttpResponse::Ok().json(result))
}

route!(refresh_status => Post "/requests/{id}/status/refresh" impl FormationDatabase);
pub async fn refresh_status<B: FormationDatabase>(
    path: web::Path<String>,
    api: web::Data<StatusFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = RequestId::from(path.into_inner());
    debug!("💻️ Status refresh request for {id}");
    let request = api.refresh_status(&id).await?;
    Ok(HttpResponse::Ok().json(request))
}

route!(override_status => Patch "/requests/{id}/status" impl FormationDatabase);
/// Administrative status override.
///
/// *Note*: the HTTP method used for this endpoint is PATCH, rather than POST.
///
/// ## Parameters
/// * `status` - The new status. String, e.g. `processing`.
/// * `reason` - Optional. Recorded in the audit trail.
///
/// ## Returns
/// The updated request. `400` if the request already has that status, `409` if the request is in a final state.
pub async fn override_status<B: FormationDatabase>(
    path: web::Path<String>,
    body: web::Json<StatusOverrideParams>,
    api: web::Data<StatusFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = RequestId::from(path.into_inner());
    let StatusOverrideParams { status, reason } = body.into_inner();
    let reason = reason.unwrap_or_else(|| "No reason provided".to_string());
    info!("💻️ Status override request for {id} to {status}. Reason: {reason}");
    let request = api.override_status(&id, status, &reason).await.map_err(|e| {
        debug!("💻️ Could not override status. {e}");
        e
    })?;
    Ok(HttpResponse::Ok().json(request))
}

route!(request_activity => Get "/requests/{id}/activity" impl FormationDatabase);
pub async fn request_activity<B: FormationDatabase>(
    path: web::Path<String>,
    api: web::Data<RequestApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = RequestId::from(path.into_inner());
    trace!("💻️ Activity request for {id}");
    let activity = api.activity(&id).await?;
    Ok(HttpResponse::Ok().json(activity))
}
