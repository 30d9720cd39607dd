//! Schema bootstrap: drops every table this service knows about and recreates
//! it from scratch. All rows are lost on each run.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::errors::EngineError;

const DROP_ALL: &str = r#"
DROP TABLE IF EXISTS userstocklink, items, stocks, users CASCADE;
"#;

const CREATE_ALL: &str = r#"
CREATE OR REPLACE FUNCTION set_updated_at() RETURNS trigger AS $$
BEGIN
    IF NEW IS DISTINCT FROM OLD AND NEW.updated_at IS NOT DISTINCT FROM OLD.updated_at THEN
        NEW.updated_at := timezone('utc', now());
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TABLE users (
    id SERIAL PRIMARY KEY,
    email VARCHAR NOT NULL,
    age INTEGER,
    hashed_password VARCHAR NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMP NOT NULL DEFAULT timezone('utc', now()),
    updated_at TIMESTAMP NOT NULL DEFAULT timezone('utc', now())
);
CREATE UNIQUE INDEX ix_users_email ON users (email);

CREATE TABLE items (
    id SERIAL PRIMARY KEY,
    title VARCHAR NOT NULL,
    description VARCHAR NOT NULL,
    owner_id INTEGER NOT NULL REFERENCES users (id),
    created_at TIMESTAMP NOT NULL DEFAULT timezone('utc', now()),
    updated_at TIMESTAMP NOT NULL DEFAULT timezone('utc', now())
);
CREATE INDEX ix_items_title ON items (title);
CREATE INDEX ix_items_description ON items (description);

CREATE TABLE stocks (
    id SERIAL PRIMARY KEY,
    stock_id VARCHAR NOT NULL,
    name VARCHAR NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT timezone('utc', now()),
    updated_at TIMESTAMP NOT NULL DEFAULT timezone('utc', now())
);
CREATE UNIQUE INDEX ix_stocks_stock_id ON stocks (stock_id);
CREATE UNIQUE INDEX ix_stocks_name ON stocks (name);

CREATE TABLE userstocklink (
    user_id INTEGER NOT NULL REFERENCES users (id),
    stock_id INTEGER NOT NULL REFERENCES stocks (id),
    PRIMARY KEY (user_id, stock_id)
);

CREATE TRIGGER set_updated_at BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE PROCEDURE set_updated_at();
CREATE TRIGGER set_updated_at BEFORE UPDATE ON items
    FOR EACH ROW EXECUTE PROCEDURE set_updated_at();
CREATE TRIGGER set_updated_at BEFORE UPDATE ON stocks
    FOR EACH ROW EXECUTE PROCEDURE set_updated_at();
"#;

/// Drops and recreates all tables inside one transaction.
pub fn init_db(conn: &mut PgConnection) -> Result<(), EngineError> {
    conn.transaction(|conn| {
        debug!("Dropping tables");
        conn.batch_execute(DROP_ALL)?;

        debug!("Creating tables");
        conn.batch_execute(CREATE_ALL)?;

        Ok::<(), EngineError>(())
    })?;

    info!("Finished initializing database");
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::{get_conn, test_support::test_db};
    use crate::models::{NewItem, NewUser};
    use crate::schema::{items, users};

    fn table_columns(conn: &mut PgConnection) -> Vec<(String, String)> {
        #[derive(QueryableByName)]
        struct Column {
            #[diesel(sql_type = diesel::sql_types::Text)]
            table_name: String,
            #[diesel(sql_type = diesel::sql_types::Text)]
            column_name: String,
        }

        diesel::sql_query(
            "SELECT table_name::text, column_name::text FROM information_schema.columns \
             WHERE table_schema = current_schema() \
             AND table_name IN ('users', 'items', 'stocks', 'userstocklink') \
             ORDER BY table_name, ordinal_position",
        )
            .load::<Column>(conn)
            .unwrap()
            .into_iter()
            .map(|c| (c.table_name, c.column_name))
            .collect()
    }

    #[test]
    fn test_init_db_twice_erases_rows() {
        let db = match test_db() {
            Some(db) => db,
            None => return,
        };
        let mut conn = get_conn(&db.pool).unwrap();
        let conn: &mut PgConnection = &mut conn;

        let before = table_columns(conn);
        assert_eq!(before.len(), 7 + 6 + 5 + 2);

        let owner_id = diesel::insert_into(users::table)
            .values(&NewUser {
                email: "init@example.com".to_owned(),
                age: None,
                hashed_password: "secret".to_owned(),
                is_active: true,
            })
            .returning(users::id)
            .get_result::<i32>(conn)
            .unwrap();
        diesel::insert_into(items::table)
            .values(&NewItem {
                title: "t".to_owned(),
                description: "d".to_owned(),
                owner_id,
            })
            .execute(conn)
            .unwrap();

        init_db(conn).unwrap();

        assert_eq!(table_columns(conn), before);
        assert_eq!(users::table.count().get_result::<i64>(conn).unwrap(), 0);
        assert_eq!(items::table.count().get_result::<i64>(conn).unwrap(), 0);
    }

    #[test]
    fn test_updated_at_is_refreshed_on_update() {
        let db = match test_db() {
            Some(db) => db,
            None => return,
        };
        let mut conn = get_conn(&db.pool).unwrap();
        let conn: &mut PgConnection = &mut conn;

        let long_ago = chrono::NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let (user_id, created_at, updated_at) = diesel::insert_into(users::table)
            .values((
                users::email.eq("clock@example.com"),
                users::hashed_password.eq("secret"),
                users::created_at.eq(long_ago),
                users::updated_at.eq(long_ago),
            ))
            .returning((users::id, users::created_at, users::updated_at))
            .get_result::<(i32, chrono::NaiveDateTime, chrono::NaiveDateTime)>(conn)
            .unwrap();
        assert_eq!(created_at, updated_at);

        let refreshed = diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(users::age.eq(Some(41)))
            .returning(users::updated_at)
            .get_result::<chrono::NaiveDateTime>(conn)
            .unwrap();
        assert!(refreshed > updated_at);
    }
}
