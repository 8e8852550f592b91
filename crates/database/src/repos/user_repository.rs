//! User repository for database operations.

use chrono::Utc;
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::entities::{
    Address, AddressChanges, Company, CompanyChanges, Credential, Geo, GeoChanges, NewUser, User,
    UserChanges,
};
use crate::types::{DatabaseError, DatabaseResult};

const SELECT_USER: &str = "SELECT u.id, u.name, u.username, u.email, u.phone, u.website, \
     u.created_at, u.updated_at, \
     a.street, a.suite, a.city, a.zipcode, \
     g.lat, g.lng, \
     c.name AS company_name, c.catch_phrase, c.bs \
     FROM users u \
     LEFT JOIN addresses a ON a.user_id = u.id \
     LEFT JOIN geos g ON g.address_id = a.id \
     LEFT JOIN companies c ON c.user_id = u.id";

#[derive(FromRow)]
struct UserRow {
    id: i64,
    name: String,
    username: String,
    email: String,
    phone: String,
    website: Option<String>,
    created_at: String,
    updated_at: String,
    street: Option<String>,
    suite: Option<String>,
    city: Option<String>,
    zipcode: Option<String>,
    lat: Option<String>,
    lng: Option<String>,
    company_name: Option<String>,
    catch_phrase: Option<String>,
    bs: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let geo = match (row.lat, row.lng) {
            (Some(lat), Some(lng)) => Some(Geo { lat, lng }),
            _ => None,
        };

        let address = match (row.street, row.suite, row.city, row.zipcode) {
            (Some(street), Some(suite), Some(city), Some(zipcode)) => Some(Address {
                street,
                suite,
                city,
                zipcode,
                geo,
            }),
            _ => None,
        };

        let company = match (row.company_name, row.catch_phrase, row.bs) {
            (Some(name), Some(catch_phrase), Some(bs)) => Some(Company {
                name,
                catch_phrase,
                bs,
            }),
            _ => None,
        };

        User {
            id: row.id,
            name: row.name,
            username: row.username,
            email: row.email,
            phone: row.phone,
            website: row.website,
            address,
            company,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.username = ?"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    /// Stored credential for a user, if one was created at registration.
    pub async fn find_credential(&self, user_id: i64) -> DatabaseResult<Option<Credential>> {
        let credential = sqlx::query_as::<_, Credential>(
            "SELECT user_id, password_hash, created_at, updated_at FROM auth WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(credential)
    }

    /// All users ordered by id
    pub async fn list(&self) -> DatabaseResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} ORDER BY u.id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    pub async fn count(&self) -> DatabaseResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Insert a user, its nested records and its credential in one transaction.
    pub async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO users (name, username, email, phone, website, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_user.name)
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.phone)
        .bind(&new_user.website)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        let user_id = result.last_insert_rowid();

        if let Some(address) = &new_user.address {
            insert_address(&mut tx, user_id, address).await?;
        }

        if let Some(company) = &new_user.company {
            insert_company(&mut tx, user_id, company).await?;
        }

        sqlx::query(
            "INSERT INTO auth (user_id, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&new_user.password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(user_id, "user created");

        self.find_by_id(user_id).await?.ok_or_else(|| {
            DatabaseError::InternalError("failed to retrieve created user".to_string())
        })
    }

    /// Merge `changes` into the stored user.
    pub async fn update(&self, id: i64, changes: &UserChanges) -> DatabaseResult<User> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE users SET \
             name = COALESCE(?, name), \
             username = COALESCE(?, username), \
             email = COALESCE(?, email), \
             phone = COALESCE(?, phone), \
             website = COALESCE(?, website), \
             updated_at = ? \
             WHERE id = ?",
        )
        .bind(&changes.name)
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(&changes.phone)
        .bind(&changes.website)
        .bind(&now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {id}")));
        }

        if let Some(password_hash) = &changes.password_hash {
            sqlx::query(
                "INSERT INTO auth (user_id, password_hash, created_at, updated_at) \
                 VALUES (?, ?, ?, ?) \
                 ON CONFLICT(user_id) DO UPDATE SET \
                 password_hash = excluded.password_hash, \
                 updated_at = excluded.updated_at",
            )
            .bind(id)
            .bind(password_hash)
            .bind(&now)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(address) = &changes.address {
            upsert_address(&mut tx, id, address).await?;
        }

        if let Some(company) = &changes.company {
            upsert_company(&mut tx, id, company).await?;
        }

        tx.commit().await?;
        debug!(user_id = id, "user updated");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {id}")))
    }

    /// Delete a user. Address, geo, company and credential rows cascade.
    pub async fn delete(&self, id: i64) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {id}")));
        }

        debug!(user_id = id, "user deleted");
        Ok(())
    }
}

async fn insert_address(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
    address: &Address,
) -> DatabaseResult<()> {
    let result = sqlx::query(
        "INSERT INTO addresses (user_id, street, suite, city, zipcode) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(&address.street)
    .bind(&address.suite)
    .bind(&address.city)
    .bind(&address.zipcode)
    .execute(&mut **tx)
    .await?;

    if let Some(geo) = &address.geo {
        insert_geo(tx, result.last_insert_rowid(), geo).await?;
    }

    Ok(())
}

async fn insert_geo(
    tx: &mut Transaction<'_, Sqlite>,
    address_id: i64,
    geo: &Geo,
) -> DatabaseResult<()> {
    sqlx::query("INSERT INTO geos (address_id, lat, lng) VALUES (?, ?, ?)")
        .bind(address_id)
        .bind(&geo.lat)
        .bind(&geo.lng)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn insert_company(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
    company: &Company,
) -> DatabaseResult<()> {
    sqlx::query("INSERT INTO companies (user_id, name, catch_phrase, bs) VALUES (?, ?, ?, ?)")
        .bind(user_id)
        .bind(&company.name)
        .bind(&company.catch_phrase)
        .bind(&company.bs)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn upsert_address(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
    changes: &AddressChanges,
) -> DatabaseResult<()> {
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM addresses WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?;

    let Some((address_id,)) = existing else {
        let address = changes.complete().ok_or_else(|| {
            DatabaseError::ValidationError(
                "a new address needs street, suite, city, zipcode and complete geo".to_string(),
            )
        })?;
        return insert_address(tx, user_id, &address).await;
    };

    sqlx::query(
        "UPDATE addresses SET \
         street = COALESCE(?, street), \
         suite = COALESCE(?, suite), \
         city = COALESCE(?, city), \
         zipcode = COALESCE(?, zipcode) \
         WHERE id = ?",
    )
    .bind(&changes.street)
    .bind(&changes.suite)
    .bind(&changes.city)
    .bind(&changes.zipcode)
    .bind(address_id)
    .execute(&mut **tx)
    .await?;

    if let Some(geo) = &changes.geo {
        upsert_geo(tx, address_id, geo).await?;
    }

    Ok(())
}

async fn upsert_geo(
    tx: &mut Transaction<'_, Sqlite>,
    address_id: i64,
    changes: &GeoChanges,
) -> DatabaseResult<()> {
    let result = sqlx::query(
        "UPDATE geos SET lat = COALESCE(?, lat), lng = COALESCE(?, lng) WHERE address_id = ?",
    )
    .bind(&changes.lat)
    .bind(&changes.lng)
    .bind(address_id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        let geo = changes.complete().ok_or_else(|| {
            DatabaseError::ValidationError("a new geo needs lat and lng".to_string())
        })?;
        insert_geo(tx, address_id, &geo).await?;
    }

    Ok(())
}

async fn upsert_company(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
    changes: &CompanyChanges,
) -> DatabaseResult<()> {
    let result = sqlx::query(
        "UPDATE companies SET \
         name = COALESCE(?, name), \
         catch_phrase = COALESCE(?, catch_phrase), \
         bs = COALESCE(?, bs) \
         WHERE user_id = ?",
    )
    .bind(&changes.name)
    .bind(&changes.catch_phrase)
    .bind(&changes.bs)
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        let company = changes.complete().ok_or_else(|| {
            DatabaseError::ValidationError(
                "a new company needs name, catchPhrase and bs".to_string(),
            )
        })?;
        insert_company(tx, user_id, &company).await?;
    }

    Ok(())
}
