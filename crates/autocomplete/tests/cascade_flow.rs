mod common;

use cascade_autocomplete::{CascadeCoordinator, FieldId, FieldSpec, FilterValue, OptionItem};
use common::{EventLog, ScriptedSource, Session};
use pretty_assertions::assert_eq;

const BRANDS: &str = "https://shop.test/api/brands";
const MODELS: &str = "https://shop.test/api/models";
const NUMBERS: &str = "https://shop.test/api/model-numbers";

fn session() -> Session {
	let log = EventLog::default();
	let source = ScriptedSource::new(log.clone())
		.endpoint(BRANDS, &["Nike", "Adidas"])
		.endpoint(MODELS, &["Air Max", "Air Force"])
		.endpoint(NUMBERS, &["AM90", "AM95"]);
	Session::new(source, log)
}

fn coordinator(session: &Session) -> CascadeCoordinator {
	let mut coordinator = CascadeCoordinator::new();
	coordinator.register(session.field(FieldSpec::new("brand", BRANDS))).unwrap();
	coordinator
		.register(session.field(FieldSpec::new("model", MODELS).prefetched().parent("brand", "brand")))
		.unwrap();
	coordinator
		.register(session.field(FieldSpec::new("number", NUMBERS).parent("model", "model")))
		.unwrap();
	coordinator
}

fn selected(coordinator: &CascadeCoordinator, id: &str) -> String {
	coordinator.field(&FieldId::new(id)).unwrap().state().selected_value.clone()
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn changing_brand_clears_the_chain_before_the_model_refetch() {
	let session = session();
	let mut coordinator = coordinator(&session);
	let brand = FieldId::new("brand");
	let model = FieldId::new("model");
	let number = FieldId::new("number");

	coordinator.input(&brand, "ni").unwrap();
	coordinator.settle(&brand).await.unwrap();
	coordinator.select(&brand, OptionItem::new("nike", "Nike")).unwrap();
	coordinator.settle_all().await;

	coordinator.select(&model, OptionItem::new("air-max", "Air Max")).unwrap();
	coordinator.input(&number, "am9").unwrap();
	coordinator.settle_all().await;
	coordinator.select(&number, OptionItem::new("am90", "AM90")).unwrap();
	assert_eq!(selected(&coordinator, "number"), "am90");

	coordinator.select(&brand, OptionItem::new("adidas", "Adidas")).unwrap();
	coordinator.settle_all().await;

	assert_eq!(selected(&coordinator, "model"), "");
	assert_eq!(selected(&coordinator, "number"), "");

	let entries = session.log.entries();
	let second_brand = session.log.position("brand=adidas").unwrap();
	let tail = &entries[second_brand..];
	let cleared_model = tail.iter().position(|e| e == "model=").unwrap();
	let cleared_number = tail.iter().position(|e| e == "number=").unwrap();
	let refetch = tail.iter().position(|e| e.starts_with(&format!("fetch {MODELS}"))).unwrap();
	assert!(cleared_model < refetch, "model cleared before refetch: {tail:?}");
	assert!(cleared_number < refetch, "number cleared before refetch: {tail:?}");

	let last_model_request = session.source.calls().into_iter().rev().find(|r| r.endpoint == MODELS).unwrap();
	assert_eq!(last_model_request.filters.get("brand"), Some(&FilterValue::from("adidas")));
	assert!(coordinator.field(&number).unwrap().is_disabled());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn remote_child_fetches_with_parent_filter_once_typed() {
	let session = session();
	let mut coordinator = coordinator(&session);
	let model = FieldId::new("model");
	let number = FieldId::new("number");

	coordinator.select(&FieldId::new("brand"), OptionItem::new("nike", "Nike")).unwrap();
	coordinator.select(&model, OptionItem::new("air-max", "Air Max")).unwrap();
	coordinator.settle_all().await;

	// A remote child with empty input waits for typing.
	assert!(session.source.calls().iter().all(|r| r.endpoint != NUMBERS));

	coordinator.input(&number, "am").unwrap();
	coordinator.settle(&number).await.unwrap();
	let request = session.source.calls().into_iter().find(|r| r.endpoint == NUMBERS).unwrap();
	assert_eq!(request.filters.get("model"), Some(&FilterValue::from("air-max")));
	let view = coordinator.field(&number).unwrap().view();
	let labels: Vec<_> = view.options.iter().map(|o| o.label.as_str()).collect();
	assert_eq!(labels, vec!["AM90", "AM95"]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn model_options_are_scoped_to_the_brand_in_the_cache() {
	let session = session();
	let mut coordinator = coordinator(&session);
	let brand = FieldId::new("brand");

	coordinator.select(&brand, OptionItem::new("nike", "Nike")).unwrap();
	coordinator.settle_all().await;
	coordinator.select(&brand, OptionItem::new("adidas", "Adidas")).unwrap();
	coordinator.settle_all().await;
	coordinator.select(&brand, OptionItem::new("nike", "Nike")).unwrap();
	coordinator.settle_all().await;

	let model_fetches = session.source.calls().iter().filter(|r| r.endpoint == MODELS).count();
	assert_eq!(model_fetches, 2, "third selection is a cache hit");
	assert_eq!(session.cache.len(), 2);
}
