pub use sea_orm_migration::prelude::*;

mod util;
mod m20251006_090000_init;
mod m20251006_091000_seed;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251006_090000_init::Migration),
            Box::new(m20251006_091000_seed::Migration),
        ]
    }
}
