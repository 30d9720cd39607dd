use actix_web::{web, HttpResponse};
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::common::{get_conn, Pool};
use crate::errors::EngineError;
use crate::models::{Item, NewItem, ITEM_COLUMNS};
use crate::schema::items;

use super::method_not_allowed;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/items/")
            .route(web::post().to(create_item))
            .default_service(web::to(method_not_allowed))
    );
}

pub async fn create_item(
    new_item: web::Json<NewItem>,
    pool: web::Data<Pool>
) -> Result<HttpResponse, EngineError> {
    let new_item = new_item.into_inner();
    let item = web::block(move || create_item_query(new_item, &pool)).await??;
    Ok(HttpResponse::Ok().json(item))
}

/// Fails with a foreign key violation when `owner_id` names no user.
pub(crate) fn create_item_query(new_item: NewItem, pool: &Pool) -> Result<Item, EngineError> {
    let mut conn = get_conn(pool)?;
    let conn: &mut PgConnection = &mut conn;

    conn.transaction(|conn| {
        let query = diesel::insert_into(items::table)
            .values(&new_item)
            .returning(ITEM_COLUMNS);

        debug!("Create item SQL: {}", diesel::debug_query::<diesel::pg::Pg, _>(&query));

        query.get_result::<Item>(conn)
            .map_err(|db_err| {
                debug!("Database insert error when creating item: {}", db_err);
                EngineError::InternalError(format!("Failed to insert item for owner {}: {}", new_item.owner_id, db_err))
            })
    })
}
