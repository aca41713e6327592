use anyhow::Result;
use serde_json::{json, Value};

use crate::api::AppContext;
use crate::logic::{NestedArrayService, ResourceService};
use crate::model::{Document, ResourceKind};
use crate::store::DocumentStore;

fn document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

/// Insert a demonstration institute (with courses) and a student group
pub async fn load_seed_data<S: DocumentStore>(ctx: &AppContext<S>) -> Result<()> {
    let institutes = ctx.registry.resolve(ResourceKind::Institutes.path())?;
    let (institute_id, _) = ResourceService::new(&*ctx.store, institutes)
        .create(document(json!({
            "name": "Acme Institute",
            "city": "Pune",
            "established": 1999
        })))
        .await?;

    let nested = NestedArrayService::new(&*ctx.store, institutes, &ctx.allowed_arrays)?;
    let courses = nested.array_field("courses")?;
    let catalogue = [("Mathematics", 4), ("Physics", 3), ("Chemistry", 3)];
    for (title, credits) in catalogue {
        let course = document(json!({ "title": title, "credits": credits }));
        nested.append(&institute_id, &courses, course).await?;
    }

    let groups = ctx.registry.resolve(ResourceKind::Groups.path())?;
    ResourceService::new(&*ctx.store, groups)
        .create(document(json!({
            "name": "Batch A",
            "category": "science",
            "students": []
        })))
        .await?;

    log::info!("Seeded institute {} with {} courses", institute_id, catalogue.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NestedConfig;
    use crate::store::{LocalObjectStorage, MemoryStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seed_creates_institute_with_courses() {
        let ctx = AppContext::initialize(
            Arc::new(MemoryStore::new()),
            Arc::new(LocalObjectStorage::new(std::env::temp_dir())),
            &NestedConfig::default(),
        )
        .await
        .unwrap();

        load_seed_data(&ctx).await.unwrap();

        let institutes = ctx.store.find("Institutes").await.unwrap();
        assert_eq!(institutes.len(), 1);
        assert_eq!(institutes[0]["courses"].as_array().unwrap().len(), 3);
        assert_eq!(ctx.store.find("Groups").await.unwrap().len(), 1);
    }
}
