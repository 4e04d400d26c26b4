use sqlx::SqlitePool;

use crate::auth::repo::{NewUser, User};

/// Insert a minimal activated user and return its id.
pub async fn seed_user(db: &SqlitePool, email: &str, username: &str) -> i64 {
    let user = User::create(
        db,
        NewUser {
            username,
            first_name: "Test",
            last_name: "User",
            email,
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$unused$unused",
            phone_number: "+15550000000",
            city: "Testville",
            country: "Testland",
            bio: None,
            avatar: None,
        },
    )
    .await
    .expect("seed user");
    user.id
}
