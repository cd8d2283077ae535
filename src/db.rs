use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use rocket::{Build, Rocket};
use rocket_sync_db_pools::{database, diesel};

#[database("clothing_inventory")]
pub(crate) struct DbConn(diesel::PgConnection);

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub(crate) async fn run_db_migrations(rocket: Rocket<Build>) -> Rocket<Build> {
    let conn = DbConn::get_one(&rocket).await.expect("database connection");
    conn.run(|c| c.run_pending_migrations(MIGRATIONS).map(|_| ()))
        .await
        .expect("can run migrations");

    rocket
}
