use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use super::*;
use crate::cache::{MemoryStore, OptionCache};
use crate::clock::ManualClock;
use crate::config::{CacheConfig, SchedulerConfig};
use crate::error::FetchError;
use crate::source::{OptionPage, OptionRequest, OptionSource};

#[derive(Debug, Default)]
struct EndpointSource {
	pages: BTreeMap<String, Vec<OptionItem>>,
	calls: Mutex<Vec<OptionRequest>>,
}

#[async_trait]
impl OptionSource for EndpointSource {
	async fn fetch(&self, request: &OptionRequest) -> std::result::Result<OptionPage, FetchError> {
		self.calls.lock().push(request.clone());
		Ok(OptionPage {
			data: self.pages.get(&request.endpoint).cloned().unwrap_or_default(),
			validator: String::new(),
			total: None,
		})
	}
}

struct Fixture {
	cache: Arc<OptionCache>,
	source: Arc<EndpointSource>,
}

impl Fixture {
	fn new() -> Self {
		let mut pages = BTreeMap::new();
		pages.insert("https://shop.test/brands".to_string(), vec![OptionItem::new("nike", "Nike")]);
		pages.insert("https://shop.test/models".to_string(), vec![OptionItem::new("air-max", "Air Max")]);
		pages.insert("https://shop.test/numbers".to_string(), vec![OptionItem::new("am90", "AM90")]);
		Self {
			cache: Arc::new(OptionCache::new(
				Arc::new(MemoryStore::new()),
				Arc::new(ManualClock::new(0)),
				CacheConfig::default(),
			)),
			source: Arc::new(EndpointSource {
				pages,
				..EndpointSource::default()
			}),
		}
	}

	fn field(&self, spec: FieldSpec) -> FieldController {
		FieldController::new(spec, &SchedulerConfig::default(), self.cache.clone(), self.source.clone())
	}

	fn endpoints(&self) -> Vec<String> {
		self.source.calls.lock().iter().map(|request| request.endpoint.clone()).collect()
	}
}

fn id(name: &str) -> FieldId {
	FieldId::new(name)
}

fn chain(fixture: &Fixture) -> CascadeCoordinator {
	let mut coordinator = CascadeCoordinator::new();
	coordinator.register(fixture.field(FieldSpec::new("brand", "https://shop.test/brands"))).unwrap();
	coordinator
		.register(fixture.field(FieldSpec::new("model", "https://shop.test/models").prefetched().parent("brand", "brand")))
		.unwrap();
	coordinator
		.register(fixture.field(FieldSpec::new("number", "https://shop.test/numbers").prefetched().parent("model", "model")))
		.unwrap();
	coordinator
}

fn selected(coordinator: &CascadeCoordinator, name: &str) -> String {
	coordinator.field(&id(name)).unwrap().state().selected_value.clone()
}

#[test]
fn registration_validates_the_graph() {
	let fixture = Fixture::new();
	let mut coordinator = CascadeCoordinator::new();

	let orphan = fixture.field(FieldSpec::new("model", "https://shop.test/models").parent("brand", "brand"));
	assert_eq!(
		coordinator.register(orphan).unwrap_err(),
		CascadeError::UnknownParent {
			field: id("model"),
			parent: id("brand")
		}
	);

	let selfish = fixture.field(FieldSpec::new("loop", "https://shop.test/loop").parent("loop", "loop"));
	assert_eq!(coordinator.register(selfish).unwrap_err(), CascadeError::Cycle(id("loop")));

	coordinator.register(fixture.field(FieldSpec::new("brand", "https://shop.test/brands"))).unwrap();
	let twin = fixture.field(FieldSpec::new("brand", "https://shop.test/brands"));
	assert_eq!(coordinator.register(twin).unwrap_err(), CascadeError::DuplicateField(id("brand")));

	assert_eq!(
		coordinator.select(&id("missing"), OptionItem::new("x", "x")).unwrap_err(),
		CascadeError::UnknownField(id("missing"))
	);
}

#[test]
fn descendants_are_transitive_and_ordered() {
	let fixture = Fixture::new();
	let mut coordinator = chain(&fixture);
	coordinator
		.register(fixture.field(FieldSpec::new("size", "https://shop.test/sizes").optional_parent("brand", "brand")))
		.unwrap();

	assert_eq!(coordinator.dependents_of(&id("brand")), vec![id("model"), id("size")]);
	assert_eq!(coordinator.descendants_of(&id("brand")), vec![id("model"), id("size"), id("number")]);
	assert_eq!(coordinator.descendants_of(&id("model")), vec![id("number")]);
	assert!(coordinator.descendants_of(&id("number")).is_empty());
}

#[test]
fn diamond_descendants_are_listed_once() {
	let fixture = Fixture::new();
	let mut coordinator = CascadeCoordinator::new();
	coordinator.register(fixture.field(FieldSpec::new("a", "https://shop.test/a"))).unwrap();
	coordinator.register(fixture.field(FieldSpec::new("b", "https://shop.test/b").parent("a", "a"))).unwrap();
	coordinator.register(fixture.field(FieldSpec::new("c", "https://shop.test/c").parent("a", "a"))).unwrap();
	coordinator
		.register(fixture.field(FieldSpec::new("d", "https://shop.test/d").parent("b", "b").parent("c", "c")))
		.unwrap();

	assert_eq!(coordinator.descendants_of(&id("a")), vec![id("b"), id("c"), id("d")]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn disabled_prefetched_children_do_not_fetch_on_register() {
	let fixture = Fixture::new();
	let coordinator = chain(&fixture);

	assert!(coordinator.field(&id("model")).unwrap().is_disabled());
	assert!(coordinator.field(&id("number")).unwrap().is_disabled());
	assert!(fixture.endpoints().is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn selecting_a_parent_prefetches_the_child_with_its_filter() {
	let fixture = Fixture::new();
	let mut coordinator = chain(&fixture);

	coordinator.select(&id("brand"), OptionItem::new("nike", "Nike")).unwrap();
	coordinator.settle_all().await;

	assert_eq!(fixture.endpoints(), vec!["https://shop.test/models".to_string()]);
	let request = fixture.source.calls.lock()[0].clone();
	assert_eq!(request.filters.get("brand"), Some(&FilterValue::from("nike")));
	assert_eq!(request.query, "");

	let model = coordinator.field(&id("model")).unwrap();
	assert!(!model.is_disabled());
	assert_eq!(model.state().ranked_options, vec![OptionItem::new("air-max", "Air Max")]);
	assert!(coordinator.field(&id("number")).unwrap().is_disabled());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn changing_the_root_resets_the_whole_chain() {
	let fixture = Fixture::new();
	let mut coordinator = chain(&fixture);

	coordinator.select(&id("brand"), OptionItem::new("nike", "Nike")).unwrap();
	coordinator.settle_all().await;
	coordinator.select(&id("model"), OptionItem::new("air-max", "Air Max")).unwrap();
	coordinator.settle_all().await;
	coordinator.select(&id("number"), OptionItem::new("am90", "AM90")).unwrap();
	assert_eq!(selected(&coordinator, "number"), "am90");

	coordinator.select(&id("brand"), OptionItem::new("adidas", "Adidas")).unwrap();
	assert_eq!(selected(&coordinator, "model"), "");
	assert_eq!(selected(&coordinator, "number"), "");
	assert_eq!(coordinator.field(&id("model")).unwrap().state().input_text, "");
	assert!(coordinator.field(&id("model")).unwrap().state().ranked_options.is_empty());
	assert!(coordinator.field(&id("number")).unwrap().is_disabled());

	coordinator.settle_all().await;
	let last = fixture.source.calls.lock().last().cloned().unwrap();
	assert_eq!(last.endpoint, "https://shop.test/models");
	assert_eq!(last.filters.get("brand"), Some(&FilterValue::from("adidas")));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn reselecting_the_same_value_keeps_children() {
	let fixture = Fixture::new();
	let mut coordinator = chain(&fixture);

	coordinator.select(&id("brand"), OptionItem::new("nike", "Nike")).unwrap();
	coordinator.settle_all().await;
	coordinator.select(&id("model"), OptionItem::new("air-max", "Air Max")).unwrap();

	coordinator.select(&id("brand"), OptionItem::new("nike", "Nike")).unwrap();
	assert_eq!(selected(&coordinator, "model"), "air-max");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn clearing_a_parent_disables_descendants() {
	let fixture = Fixture::new();
	let mut coordinator = chain(&fixture);

	coordinator.select(&id("brand"), OptionItem::new("nike", "Nike")).unwrap();
	coordinator.settle_all().await;
	coordinator.select(&id("model"), OptionItem::new("air-max", "Air Max")).unwrap();
	coordinator.settle_all().await;

	coordinator.clear(&id("brand")).unwrap();
	assert_eq!(selected(&coordinator, "brand"), "");
	assert_eq!(selected(&coordinator, "model"), "");
	assert!(coordinator.field(&id("model")).unwrap().is_disabled());
	assert!(coordinator.field(&id("number")).unwrap().is_disabled());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn keyboard_selection_cascades_too() {
	let fixture = Fixture::new();
	let mut coordinator = chain(&fixture);

	coordinator.select(&id("brand"), OptionItem::new("nike", "Nike")).unwrap();
	coordinator.settle_all().await;
	coordinator.key(&id("model"), Key::Down).unwrap();
	coordinator.key(&id("model"), Key::Down).unwrap();
	coordinator.key(&id("model"), Key::Enter).unwrap();
	assert_eq!(selected(&coordinator, "model"), "air-max");

	coordinator.settle_all().await;
	assert!(!coordinator.field(&id("number")).unwrap().is_disabled());
	assert_eq!(fixture.endpoints().last().map(String::as_str), Some("https://shop.test/numbers"));
}
