//! SeaORM implementation of TableRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::domain::table::{Table, TableRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::dining_table;

pub struct SeaOrmTableRepository {
    db: DatabaseConnection,
}

impl SeaOrmTableRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: dining_table::Model) -> Table {
    Table {
        id: m.id,
        capacity: m.capacity,
    }
}

#[async_trait]
impl TableRepository for SeaOrmTableRepository {
    async fn create(&self, capacity: i32) -> DomainResult<Table> {
        debug!("Creating table with capacity {}", capacity);

        let model = dining_table::ActiveModel {
            capacity: Set(capacity),
            ..Default::default()
        };
        let saved = model.insert(&self.db).await?;
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Table>> {
        let model = dining_table::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn list(&self) -> DomainResult<Vec<Table>> {
        let models = dining_table::Entity::find()
            .order_by_asc(dining_table::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
