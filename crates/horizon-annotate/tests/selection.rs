//! Integration tests for label selection through a labeling document.

use horizon_annotate::{
    Background, Choice, Document, Error, Label, LabelAttrs, LabelGroup, ObjectId, Region,
    RegionId, Task, ToggleOutcome, color_for,
    tags::{Labels, RectangleLabels, View},
};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const BRAND_PRODUCT: &str = r#"
<View>
  <Labels name="type" toName="txt-1">
    <Label alias="B" value="Brand" />
    <Label alias="P" value="Product" />
  </Labels>
  <Text name="txt-1" value="$text" />
</View>"#;

fn brand_product() -> (Document, ObjectId, ObjectId) {
    init_tracing();
    let doc = Document::from_config(BRAND_PRODUCT).unwrap();
    doc.update_values(&Task::new(1, json!({"text": "Apple released a new phone"})));
    let labels = doc.labels("type").unwrap();
    (doc, labels[0], labels[1])
}

fn with_highlighted_region(doc: &mut Document) -> RegionId {
    let region = doc.completion_mut().add_region(Region::new("txt-1"));
    assert!(doc.completion_mut().highlight(region));
    region
}

fn selected(doc: &Document) -> Vec<String> {
    doc.selected_values("type").unwrap()
}

#[test]
fn test_brand_product_scenario() {
    let (mut doc, brand, product) = brand_product();

    doc.click(brand).unwrap();
    assert_eq!(selected(&doc), vec!["Brand"]);

    doc.click(product).unwrap();
    assert_eq!(selected(&doc), vec!["Product"]);

    doc.click(product).unwrap();
    assert!(selected(&doc).is_empty());
}

#[test]
fn test_last_label_of_highlighted_region_is_kept() {
    let (mut doc, brand, product) = brand_product();
    let region = with_highlighted_region(&mut doc);

    assert_eq!(doc.toggle_selected(brand).unwrap(), ToggleOutcome::Selected);
    assert_eq!(doc.toggle_selected(brand).unwrap(), ToggleOutcome::Kept);
    assert_eq!(selected(&doc), vec!["Brand"]);
    assert_eq!(doc.completion().region(region).unwrap().labels("type"), ["Brand"]);

    // Another label still replaces it.
    assert_eq!(doc.toggle_selected(product).unwrap(), ToggleOutcome::Selected);
    assert_eq!(selected(&doc), vec!["Product"]);
    assert_eq!(doc.completion().region(region).unwrap().labels("type"), ["Product"]);
}

#[test]
fn test_guard_does_not_apply_without_region() {
    let (mut doc, brand, _) = brand_product();
    doc.toggle_selected(brand).unwrap();
    assert_eq!(doc.toggle_selected(brand).unwrap(), ToggleOutcome::Deselected);
    assert!(selected(&doc).is_empty());
}

#[test]
fn test_guard_skipped_with_several_selected() {
    let mut doc = Document::new();
    let group = doc
        .add_labels(
            None,
            RectangleLabels::new(LabelGroup::new("box", "img").with_choice(Choice::Multiple)),
        )
        .unwrap();
    let car = doc.add_label(group, Label::new(LabelAttrs::with_value("Car"))).unwrap();
    let bus = doc.add_label(group, Label::new(LabelAttrs::with_value("Bus"))).unwrap();
    doc.update_values(&Task::new(1, json!({})));
    let region = with_highlighted_region(&mut doc);

    doc.toggle_selected(car).unwrap();
    doc.toggle_selected(bus).unwrap();
    assert_eq!(doc.selected_values("box").unwrap(), vec!["Car", "Bus"]);

    assert_eq!(doc.toggle_selected(car).unwrap(), ToggleOutcome::Deselected);
    assert_eq!(doc.selected_values("box").unwrap(), vec!["Bus"]);
    assert_eq!(doc.completion().region(region).unwrap().labels("box"), ["Bus"]);

    // Bus is now the region's only label.
    assert_eq!(doc.toggle_selected(bus).unwrap(), ToggleOutcome::Kept);
}

#[test]
fn test_multiple_choice_accumulates() {
    let mut doc = Document::from_config(
        r#"<View>
             <Labels name="tags" toName="txt" choice="multiple">
               <Label value="A" />
               <Label value="B" />
             </Labels>
           </View>"#,
    )
    .unwrap();
    doc.update_values(&Task::new(1, json!({})));
    let labels = doc.labels("tags").unwrap();

    doc.toggle_selected(labels[0]).unwrap();
    doc.toggle_selected(labels[1]).unwrap();
    assert_eq!(doc.selected_values("tags").unwrap(), vec!["A", "B"]);

    doc.toggle_selected(labels[0]).unwrap();
    assert_eq!(doc.selected_values("tags").unwrap(), vec!["B"]);
}

#[test]
fn test_single_choice_reselect() {
    let (mut doc, brand, product) = brand_product();

    doc.toggle_selected(brand).unwrap();
    doc.toggle_selected(product).unwrap();
    assert!(!doc.label(brand).unwrap().is_selected());
    assert!(doc.label(product).unwrap().is_selected());

    doc.toggle_selected(product).unwrap();
    assert!(selected(&doc).is_empty());
}

#[test]
fn test_single_choice_never_exceeds_one() {
    let mut doc = Document::new();
    let group = doc
        .add_labels(None, Labels::new(LabelGroup::new("type", "txt")))
        .unwrap();
    let ids: Vec<_> = ["A", "B", "C", "D"]
        .into_iter()
        .map(|v| doc.add_label(group, Label::new(LabelAttrs::with_value(v))).unwrap())
        .collect();
    doc.update_values(&Task::new(1, json!({})));

    let sequence = [0, 1, 1, 3, 2, 2, 0, 3, 3, 1, 0, 0, 2];
    for (step, &i) in sequence.iter().enumerate() {
        doc.toggle_selected(ids[i]).unwrap();
        let count = doc.selected_values("type").unwrap().len();
        assert!(count <= 1, "step {step}: {count} labels selected");
    }
}

#[test]
fn test_single_choice_clears_preselected_labels() {
    let mut doc = Document::from_config(
        r#"<View>
             <Labels name="type" toName="txt">
               <Label value="A" selected="true" />
               <Label value="B" selected="true" />
               <Label value="C" />
             </Labels>
           </View>"#,
    )
    .unwrap();
    doc.update_values(&Task::new(1, json!({})));
    assert_eq!(doc.selected_values("type").unwrap(), vec!["A", "B"]);

    let c = doc.labels("type").unwrap()[2];
    doc.toggle_selected(c).unwrap();
    assert_eq!(doc.selected_values("type").unwrap(), vec!["C"]);
}

#[test]
fn test_label_resolves_group_through_views() {
    init_tracing();
    let mut doc = Document::from_config(
        r#"<View>
             <Labels name="type" toName="txt">
               <View name="column">
                 <Label value="Nested" />
               </View>
               <Label value="Flat" />
             </Labels>
           </View>"#,
    )
    .unwrap();
    doc.update_values(&Task::new(1, json!({})));
    let labels = doc.labels("type").unwrap();
    assert_eq!(labels.len(), 2);

    doc.toggle_selected(labels[0]).unwrap();
    doc.toggle_selected(labels[1]).unwrap();
    assert_eq!(doc.selected_values("type").unwrap(), vec!["Flat"]);
}

#[test]
fn test_toggle_without_container_fails() {
    let mut doc = Document::new();
    let view = doc.add_tag(None, View::new("View")).unwrap();
    let orphan = doc.add_label(view, Label::new(LabelAttrs::with_value("Lonely"))).unwrap();

    assert!(matches!(
        doc.toggle_selected(orphan),
        Err(Error::NoLabelContainer { label }) if label == orphan
    ));
    assert!(matches!(doc.toggle_selected(view), Err(Error::NotALabel(_))));
}

#[test]
fn test_templated_values_and_stable_colors() {
    init_tracing();
    let mut doc = Document::from_config(
        r#"<View>
             <Labels name="type" toName="txt">
               <Label value="$first" />
               <Label value="Fixed" background="orange" />
             </Labels>
           </View>"#,
    )
    .unwrap();
    let labels = doc.labels("type").unwrap();
    let templated = doc.label(labels[0]).unwrap();
    let background = templated.background();
    assert_eq!(background, Background::Derived(color_for("$first")));

    doc.update_values(&Task::new(1, json!({"first": "Person"})));
    assert_eq!(doc.label(labels[0]).unwrap().resolved_value(), "Person");
    doc.update_values(&Task::new(2, json!({"first": "Place"})));
    assert_eq!(doc.label(labels[0]).unwrap().resolved_value(), "Place");
    assert_eq!(doc.label(labels[0]).unwrap().background(), background);
    assert_eq!(
        doc.label(labels[1]).unwrap().background(),
        Background::Explicit("orange".into())
    );

    // A task without the variable resolves to an empty value.
    doc.update_values(&Task::new(3, json!({})));
    assert_eq!(doc.label(labels[0]).unwrap().resolved_value(), "");

    doc.update_values(&Task::new(4, json!({"first": "Person"})));
    doc.toggle_selected(labels[0]).unwrap();
    assert_eq!(doc.selected_values("type").unwrap(), vec!["Person"]);
}

#[test]
fn test_color_for_is_deterministic() {
    assert_eq!(color_for("Brand"), color_for("Brand"));
    assert_eq!(color_for(""), color_for(""));
    assert_ne!(color_for("Brand"), color_for("Product"));
}

#[test]
fn test_selection_signals() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    let (mut doc, brand, product) = brand_product();
    let changes = Arc::new(AtomicUsize::new(0));
    for id in [brand, product] {
        let changes = changes.clone();
        doc.label(id)
            .unwrap()
            .selected_changed
            .connect(move |_| {
                changes.fetch_add(1, Ordering::SeqCst);
            });
    }

    doc.toggle_selected(brand).unwrap();
    assert_eq!(changes.load(Ordering::SeqCst), 1);
    // Brand off, Product on.
    doc.toggle_selected(product).unwrap();
    assert_eq!(changes.load(Ordering::SeqCst), 3);
}
