use actix_web::{web, HttpResponse};
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::common::{get_conn, Pool};
use crate::errors::EngineError;
use crate::models::{NewStock, Stock, User, STOCK_COLUMNS, USER_COLUMNS};
use crate::schema::{stocks, users, userstocklink};

use super::method_not_allowed;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/stocks/")
            .route(web::post().to(create_stock))
            .default_service(web::to(method_not_allowed))
    )
    .service(
        web::resource("/stocks")
            .route(web::get().to(get_stocks))
            .default_service(web::to(method_not_allowed))
    )
    .service(
        web::resource("/stocks/{stock_id}/users")
            .route(web::get().to(get_stock_users))
            .default_service(web::to(method_not_allowed))
    );
}

///////////////

pub async fn create_stock(
    new_stock: web::Json<NewStock>,
    pool: web::Data<Pool>
) -> Result<HttpResponse, EngineError> {
    let new_stock = new_stock.into_inner();
    let stock = web::block(move || create_stock_query(new_stock, &pool)).await??;
    Ok(HttpResponse::Ok().json(stock))
}

pub(crate) fn create_stock_query(new_stock: NewStock, pool: &Pool) -> Result<Stock, EngineError> {
    let mut conn = get_conn(pool)?;
    let conn: &mut PgConnection = &mut conn;

    conn.transaction(|conn| {
        let query = diesel::insert_into(stocks::table)
            .values(&new_stock)
            .returning(STOCK_COLUMNS);

        debug!("Create stock SQL: {}", diesel::debug_query::<diesel::pg::Pg, _>(&query));

        query.get_result::<Stock>(conn)
            .map_err(|db_err| {
                debug!("Database insert error when creating stock: {}", db_err);
                EngineError::InternalError(format!("Failed to insert stock, the symbol or name may be taken: {}", db_err))
            })
    })
}

//////////////

pub async fn get_stocks(pool: web::Data<Pool>) -> Result<HttpResponse, EngineError> {
    let stocks = web::block(move || get_stocks_query(&pool)).await??;
    Ok(HttpResponse::Ok().json(stocks))
}

fn get_stocks_query(pool: &Pool) -> Result<Vec<Stock>, EngineError> {
    let mut conn = get_conn(pool)?;
    let conn: &mut PgConnection = &mut conn;

    let query = stocks::table.select(STOCK_COLUMNS);

    debug!("Stocks query SQL: {}", diesel::debug_query::<diesel::pg::Pg, _>(&query));

    query
        .load::<Stock>(conn)
        .map_err(|db_err| EngineError::InternalError(format!("Failed to query stocks: {}", db_err)))
}

//////////////

pub async fn get_stock_users(
    stock_id: web::Path<i32>,
    pool: web::Data<Pool>
) -> Result<HttpResponse, EngineError> {
    let stock_id = stock_id.into_inner();
    let users = web::block(move || get_stock_users_query(stock_id, &pool)).await??;
    Ok(HttpResponse::Ok().json(users))
}

fn get_stock_users_query(stock_id: i32, pool: &Pool) -> Result<Vec<User>, EngineError> {
    let mut conn = get_conn(pool)?;
    let conn: &mut PgConnection = &mut conn;

    let exists = stocks::table
        .filter(stocks::id.eq(stock_id))
        .select(stocks::id)
        .get_result::<i32>(conn)
        .optional()
        .map_err(|db_err| EngineError::InternalError(format!("Failed to query stock: {}", db_err)))?;
    if exists.is_none() {
        return Err(EngineError::NotFound(format!("Stock {} does not exist.", stock_id)));
    }

    let query = userstocklink::table
        .inner_join(users::table)
        .filter(userstocklink::stock_id.eq(stock_id))
        .order(users::id.asc())
        .select(USER_COLUMNS);

    debug!("Stock users query SQL: {}", diesel::debug_query::<diesel::pg::Pg, _>(&query));

    query
        .load::<User>(conn)
        .map_err(|db_err| EngineError::InternalError(format!("Failed to query users: {}", db_err)))
}
