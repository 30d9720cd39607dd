table! {
    items (id) {
        id -> Int4,
        title -> Varchar,
        description -> Varchar,
        owner_id -> Int4,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    stocks (id) {
        id -> Int4,
        stock_id -> Varchar,
        name -> Varchar,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    userstocklink (user_id, stock_id) {
        user_id -> Int4,
        stock_id -> Int4,
    }
}

table! {
    users (id) {
        id -> Int4,
        email -> Varchar,
        age -> Nullable<Int4>,
        hashed_password -> Varchar,
        is_active -> Bool,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

joinable!(items -> users (owner_id));
joinable!(userstocklink -> stocks (stock_id));
joinable!(userstocklink -> users (user_id));

allow_tables_to_appear_in_same_query!(
    items,
    stocks,
    userstocklink,
    users,
);
