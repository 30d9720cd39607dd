use diesel::prelude::*;

use crate::schema::*;

/// Creation/update times shared by every entity table.
///
/// Both columns are filled by the database: defaults on insert, and the
/// `set_updated_at` trigger on update. Nothing in the application writes them.
#[derive(Debug, Clone, PartialEq, Queryable, Serialize, Deserialize)]
pub struct Timestamps {
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Queryable, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub age: Option<i32>,
    pub hashed_password: String,
    pub is_active: bool,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

pub type UserColumns = (
    users::id,
    users::email,
    users::age,
    users::hashed_password,
    users::is_active,
    (users::created_at, users::updated_at),
);

pub const USER_COLUMNS: UserColumns = (
    users::id,
    users::email,
    users::age,
    users::hashed_password,
    users::is_active,
    (users::created_at, users::updated_at),
);

fn default_is_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub age: Option<i32>,
    pub hashed_password: String,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}



#[derive(Debug, Clone, PartialEq, Queryable, Serialize, Deserialize)]
pub struct Item {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub owner_id: i32,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

pub type ItemColumns = (
    items::id,
    items::title,
    items::description,
    items::owner_id,
    (items::created_at, items::updated_at),
);

pub const ITEM_COLUMNS: ItemColumns = (
    items::id,
    items::title,
    items::description,
    items::owner_id,
    (items::created_at, items::updated_at),
);

#[derive(Debug, Clone, Deserialize, Insertable)]
#[diesel(table_name = items)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub owner_id: i32,
}



#[derive(Debug, Clone, PartialEq, Queryable, Serialize, Deserialize)]
pub struct Stock {
    pub id: i32,
    /// Ticker symbol, not a foreign key.
    pub stock_id: String,
    pub name: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

pub type StockColumns = (
    stocks::id,
    stocks::stock_id,
    stocks::name,
    (stocks::created_at, stocks::updated_at),
);

pub const STOCK_COLUMNS: StockColumns = (
    stocks::id,
    stocks::stock_id,
    stocks::name,
    (stocks::created_at, stocks::updated_at),
);

#[derive(Debug, Clone, Deserialize, Insertable)]
#[diesel(table_name = stocks)]
pub struct NewStock {
    pub stock_id: String,
    pub name: String,
}



#[derive(Debug, Clone, PartialEq, Queryable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = userstocklink)]
pub struct UserStockLink {
    pub user_id: i32,
    pub stock_id: i32,
}
