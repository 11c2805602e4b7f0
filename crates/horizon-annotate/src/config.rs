//! Labeling config parsing.
//!
//! A labeling config is an XML document describing the annotation
//! interface:
//!
//! ```xml
//! <View>
//!   <RectangleLabels name="box" toName="img" choice="multiple" strokeWidth="3">
//!     <Label value="Car" hotkey="c" />
//!     <Label value="$extra_class" background="#ff00ff" />
//!   </RectangleLabels>
//!   <Image name="img" value="$image" />
//! </View>
//! ```
//!
//! Labels containers and `<Label>` become their tag types; every other
//! element becomes a [`View`]. Element and attribute names are matched
//! without regard to ASCII case.

use std::collections::HashMap;
use std::str::FromStr;

use horizon_annotate_core::ObjectId;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::tags::{
    BrushLabels, Choice, EllipseLabels, HyperTextLabels, KeyPointLabels, Label, LabelAttrs,
    LabelGroup, Labels, LabelsKind, PolygonLabels, RectangleLabels, ShapeStyle, Tag, View,
};

/// Parse `xml` and add its tags to `document`. Returns the id of the root tag.
pub(crate) fn load(document: &mut Document, xml: &str) -> Result<ObjectId> {
    let _span = tracing::debug_span!(target: "horizon_annotate::config", "load_config").entered();

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root = None;
    let mut stack: Vec<ObjectId> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::config(format!("at byte {}: {e}", reader.buffer_position())))?;
        match event {
            Event::Start(start) => {
                let id = add_element(document, &start, stack.last().copied(), &mut root)?;
                stack.push(id);
            }
            Event::Empty(empty) => {
                add_element(document, &empty, stack.last().copied(), &mut root)?;
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let root = root.ok_or_else(|| Error::config("labeling config has no root element"))?;
    tracing::debug!(
        target: "horizon_annotate::config",
        objects = document.tree().object_count(),
        "labeling config loaded"
    );
    Ok(root)
}

fn add_element(
    document: &mut Document,
    start: &BytesStart<'_>,
    parent: Option<ObjectId>,
    root: &mut Option<ObjectId>,
) -> Result<ObjectId> {
    let element = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    if parent.is_none() && root.is_some() {
        return Err(Error::config(format!(
            "unexpected second root element <{element}>"
        )));
    }

    let attrs = Attributes::parse(&element, start)?;
    let tag = build_tag(&element, &attrs)?;

    if matches!(tag, Tag::Label(_)) && !within_container(document, parent) {
        return Err(Error::config(format!(
            "<{element}> must be placed inside a labels container"
        )));
    }

    let id = document.add_tag(parent, tag)?;
    if parent.is_none() {
        *root = Some(id);
    }
    Ok(id)
}

fn within_container(document: &Document, parent: Option<ObjectId>) -> bool {
    let Some(parent) = parent else {
        return false;
    };
    let tree = document.tree();
    tree.get(parent).is_some_and(Tag::is_label_container)
        || tree
            .find_ancestor(parent, Tag::is_label_container)
            .ok()
            .flatten()
            .is_some()
}

fn build_tag(element: &str, attrs: &Attributes) -> Result<Tag> {
    if element.eq_ignore_ascii_case("label") {
        return Ok(Tag::Label(Label::new(label_attrs(attrs)?)));
    }
    let Some(kind) = LabelsKind::from_tag_name(element) else {
        let view = View::new(element);
        return Ok(Tag::View(match attrs.get("name") {
            Some(name) => view.with_name(name),
            None => view,
        }));
    };

    let mut group = LabelGroup::new(
        attrs.required("name")?,
        attrs.get("toname").unwrap_or_default(),
    );
    if let Some(choice) = attrs.parse_value::<Choice>("choice")? {
        group = group.with_choice(choice);
    }
    if let Some(show_inline) = attrs.bool("showinline")? {
        group = group.with_show_inline(show_inline);
    }

    let tag: Tag = match kind {
        LabelsKind::Labels => Labels::new(group).into(),
        LabelsKind::BrushLabels => BrushLabels::new(group).into(),
        LabelsKind::HyperTextLabels => HyperTextLabels::new(group).into(),
        LabelsKind::EllipseLabels => EllipseLabels {
            style: shape_style(attrs)?,
            ..EllipseLabels::new(group)
        }
        .into(),
        LabelsKind::RectangleLabels => RectangleLabels {
            style: shape_style(attrs)?,
            ..RectangleLabels::new(group)
        }
        .into(),
        LabelsKind::KeyPointLabels => KeyPointLabels {
            style: shape_style(attrs)?,
            ..KeyPointLabels::new(group)
        }
        .into(),
        LabelsKind::PolygonLabels => {
            let mut labels = PolygonLabels::new(group);
            labels.style = shape_style(attrs)?;
            if let Some(size) = attrs.get("pointsize") {
                labels.point_size = size.to_string();
            }
            if let Some(style) = attrs.get("pointstyle") {
                labels.point_style = style.to_string();
            }
            labels.into()
        }
    };
    Ok(tag)
}

fn shape_style(attrs: &Attributes) -> Result<ShapeStyle> {
    let defaults = ShapeStyle::default();
    Ok(ShapeStyle {
        stroke_width: attrs.parse_value("strokewidth")?.unwrap_or(defaults.stroke_width),
        opacity: attrs.parse_value("opacity")?.unwrap_or(defaults.opacity),
        fill_color: attrs.get("fillcolor").map(str::to_string),
    })
}

fn label_attrs(attrs: &Attributes) -> Result<LabelAttrs> {
    let defaults = LabelAttrs::default();
    let owned = |key: &str| attrs.get(key).map(str::to_string);
    Ok(LabelAttrs {
        value: owned("value"),
        selected: attrs.bool("selected")?.unwrap_or(defaults.selected),
        alias: owned("alias"),
        hotkey: owned("hotkey"),
        show_alias: attrs.bool("showalias")?.unwrap_or(defaults.show_alias),
        alias_style: owned("aliasstyle").unwrap_or(defaults.alias_style),
        size: owned("size").unwrap_or(defaults.size),
        background: owned("background"),
        selected_color: owned("selectedcolor").unwrap_or(defaults.selected_color),
    })
}

/// Attributes of one element, keyed by lowercased name.
struct Attributes<'a> {
    element: &'a str,
    values: HashMap<String, String>,
}

impl<'a> Attributes<'a> {
    fn parse(element: &'a str, start: &BytesStart<'_>) -> Result<Self> {
        let mut values = HashMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::config(format!("<{element}>: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::invalid_attribute(element, &key, e.to_string()))?
                .into_owned();
            values.insert(key, value);
        }
        Ok(Self { element, values })
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn required(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| Error::invalid_attribute(self.element, key, "attribute is required"))
    }

    fn bool(&self, key: &str) -> Result<Option<bool>> {
        self.get(key)
            .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(Error::invalid_attribute(
                    self.element,
                    key,
                    format!("expected 'true' or 'false', got '{raw}'"),
                )),
            })
            .transpose()
    }

    fn parse_value<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|e: T::Err| Error::invalid_attribute(self.element, key, e.to_string()))
            })
            .transpose()
    }
}
