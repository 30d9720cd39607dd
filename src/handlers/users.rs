use actix_web::{web, HttpResponse};
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::common::{get_conn, Pool};
use crate::errors::EngineError;
use crate::models::{
    Item, NewUser, Stock, User, UserStockLink, ITEM_COLUMNS, STOCK_COLUMNS, USER_COLUMNS,
};
use crate::schema::{items, stocks, users, userstocklink};

use super::method_not_allowed;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users/")
            .route(web::post().to(create_user))
            .default_service(web::to(method_not_allowed))
    )
    .service(
        web::resource("/users")
            .route(web::get().to(get_users))
            .default_service(web::to(method_not_allowed))
    )
    .service(
        web::resource("/two_users/{id_1}/{id_2}")
            .route(web::get().to(get_two_users))
            .default_service(web::to(method_not_allowed))
    )
    .service(
        web::resource("/users/{user_id}/items")
            .route(web::get().to(get_user_items))
            .default_service(web::to(method_not_allowed))
    )
    .service(
        web::resource("/users/{user_id}/stocks")
            .route(web::get().to(get_user_stocks))
            .default_service(web::to(method_not_allowed))
    )
    .service(
        web::resource("/users/{user_id}/stocks/{stock_id}")
            .route(web::post().to(link_user_stock))
            .default_service(web::to(method_not_allowed))
    );
}

///////////////

pub async fn create_user(
    new_user: web::Json<NewUser>,
    pool: web::Data<Pool>
) -> Result<HttpResponse, EngineError> {
    let new_user = new_user.into_inner();
    let user = web::block(move || create_user_query(new_user, &pool)).await??;
    Ok(HttpResponse::Ok().json(user))
}

pub(crate) fn create_user_query(new_user: NewUser, pool: &Pool) -> Result<User, EngineError> {
    let mut conn = get_conn(pool)?;
    let conn: &mut PgConnection = &mut conn;

    conn.transaction(|conn| {
        let query = diesel::insert_into(users::table)
            .values(&new_user)
            .returning(USER_COLUMNS);

        debug!("Create user SQL: {}", diesel::debug_query::<diesel::pg::Pg, _>(&query));

        query.get_result::<User>(conn)
            .map_err(|db_err| {
                debug!("Database insert error when creating user: {}", db_err);
                EngineError::InternalError(format!("Failed to insert user, the email may already be taken: {}", db_err))
            })
    })
}

//////////////

pub async fn get_users(pool: web::Data<Pool>) -> Result<HttpResponse, EngineError> {
    let users = web::block(move || get_users_query(&pool)).await??;
    Ok(HttpResponse::Ok().json(users))
}

fn get_users_query(pool: &Pool) -> Result<Vec<User>, EngineError> {
    let mut conn = get_conn(pool)?;
    let conn: &mut PgConnection = &mut conn;

    let query = users::table.select(USER_COLUMNS);

    debug!("Users query SQL: {}", diesel::debug_query::<diesel::pg::Pg, _>(&query));

    query
        .load::<User>(conn)
        .map_err(|db_err| EngineError::InternalError(format!("Failed to query users: {}", db_err)))
}

//////////////

pub async fn get_two_users(
    ids: web::Path<(i32, i32)>,
    pool: web::Data<Pool>
) -> Result<HttpResponse, EngineError> {
    let (id_1, id_2) = ids.into_inner();
    let users = web::block(move || get_two_users_query(id_1, id_2, &pool)).await??;
    Ok(HttpResponse::Ok().json(users))
}

fn get_two_users_query(id_1: i32, id_2: i32, pool: &Pool) -> Result<Vec<User>, EngineError> {
    let mut conn = get_conn(pool)?;
    let conn: &mut PgConnection = &mut conn;

    let query = users::table
        .filter(
            users::id.eq(id_1).or(users::id.eq(id_2))
        )
        .order(users::id.desc())
        .select(USER_COLUMNS);

    debug!("Two users query SQL: {}", diesel::debug_query::<diesel::pg::Pg, _>(&query));

    query
        .load::<User>(conn)
        .map_err(|db_err| EngineError::InternalError(format!("Failed to query users: {}", db_err)))
}

//////////////

fn ensure_user_exists(user_id: i32, conn: &mut PgConnection) -> Result<(), EngineError> {
    let query = users::table
        .filter(users::id.eq(user_id))
        .select(users::id);

    debug!("User existence SQL: {}", diesel::debug_query::<diesel::pg::Pg, _>(&query));

    query
        .get_result::<i32>(conn)
        .optional()
        .map_err(|db_err| EngineError::InternalError(format!("Failed to query user: {}", db_err)))?
        .map(|_| ())
        .ok_or_else(|| EngineError::NotFound(format!("User {} does not exist.", user_id)))
}

pub async fn get_user_items(
    user_id: web::Path<i32>,
    pool: web::Data<Pool>
) -> Result<HttpResponse, EngineError> {
    let user_id = user_id.into_inner();
    let items = web::block(move || get_user_items_query(user_id, &pool)).await??;
    Ok(HttpResponse::Ok().json(items))
}

fn get_user_items_query(user_id: i32, pool: &Pool) -> Result<Vec<Item>, EngineError> {
    let mut conn = get_conn(pool)?;
    let conn: &mut PgConnection = &mut conn;

    ensure_user_exists(user_id, conn)?;

    let query = items::table
        .filter(items::owner_id.eq(user_id))
        .order(items::id.asc())
        .select(ITEM_COLUMNS);

    debug!("User items query SQL: {}", diesel::debug_query::<diesel::pg::Pg, _>(&query));

    query
        .load::<Item>(conn)
        .map_err(|db_err| EngineError::InternalError(format!("Failed to query items: {}", db_err)))
}

//////////////

pub async fn get_user_stocks(
    user_id: web::Path<i32>,
    pool: web::Data<Pool>
) -> Result<HttpResponse, EngineError> {
    let user_id = user_id.into_inner();
    let stocks = web::block(move || get_user_stocks_query(user_id, &pool)).await??;
    Ok(HttpResponse::Ok().json(stocks))
}

fn get_user_stocks_query(user_id: i32, pool: &Pool) -> Result<Vec<Stock>, EngineError> {
    let mut conn = get_conn(pool)?;
    let conn: &mut PgConnection = &mut conn;

    ensure_user_exists(user_id, conn)?;

    let query = userstocklink::table
        .inner_join(stocks::table)
        .filter(userstocklink::user_id.eq(user_id))
        .order(stocks::id.asc())
        .select(STOCK_COLUMNS);

    debug!("User stocks query SQL: {}", diesel::debug_query::<diesel::pg::Pg, _>(&query));

    query
        .load::<Stock>(conn)
        .map_err(|db_err| EngineError::InternalError(format!("Failed to query stocks: {}", db_err)))
}

//////////////

pub async fn link_user_stock(
    ids: web::Path<(i32, i32)>,
    pool: web::Data<Pool>
) -> Result<HttpResponse, EngineError> {
    let (user_id, stock_id) = ids.into_inner();
    let link = web::block(move || link_user_stock_query(UserStockLink { user_id, stock_id }, &pool)).await??;
    Ok(HttpResponse::Ok().json(link))
}

fn link_user_stock_query(link: UserStockLink, pool: &Pool) -> Result<UserStockLink, EngineError> {
    let mut conn = get_conn(pool)?;
    let conn: &mut PgConnection = &mut conn;

    conn.transaction(|conn| {
        let query = diesel::insert_into(userstocklink::table)
            .values(&link)
            .returning((userstocklink::user_id, userstocklink::stock_id));

        debug!("Link user stock SQL: {}", diesel::debug_query::<diesel::pg::Pg, _>(&query));

        query.get_result::<UserStockLink>(conn)
            .map_err(|db_err| {
                debug!("Database insert error when linking stock: {}", db_err);
                EngineError::InternalError(format!("Failed to link user {} to stock {}: {}", link.user_id, link.stock_id, db_err))
            })
    })
}
