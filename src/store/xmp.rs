//! XMP sidecar store: keeps each image's fields in `<base>.xmp` next to the image.
//!
//! Only flat properties are understood: simple text values and `rdf:Bag`/`rdf:Seq`/`rdf:Alt`
//! lists of text items, where an item may carry `xml:lang`. A sidecar holding anything
//! else (structs, resources, other qualifiers) is refused rather than rewritten, so
//! existing data is never silently dropped.

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::{FieldValue, Fields, ListItem, ListKind, MetadataStore, StoreError, split_field_id};
use crate::utils::config::SIDECAR_EXTENSION;
use crate::utils::tempfiles::write_atomic;

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// Prefixes that can be written without the sidecar declaring them first.
const WELL_KNOWN_NAMESPACES: [(&str, &str); 8] = [
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("xmp", "http://ns.adobe.com/xap/1.0/"),
    ("xmpRights", "http://ns.adobe.com/xap/1.0/rights/"),
    ("photoshop", "http://ns.adobe.com/photoshop/1.0/"),
    ("lr", "http://ns.adobe.com/lightroom/1.0/"),
    ("Iptc4xmpCore", "http://iptc.org/std/Iptc4xmpCore/1.0/xmlns/"),
    ("exif", "http://ns.adobe.com/exif/1.0/"),
    ("tiff", "http://ns.adobe.com/tiff/1.0/"),
];

fn well_known_namespace(prefix: &str) -> Option<&'static str> {
    WELL_KNOWN_NAMESPACES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, uri)| *uri)
}

/// Sidecar path for an image (`photo.jpg` → `photo.xmp`).
pub fn sidecar_path(image: &Path) -> PathBuf {
    image.with_extension(SIDECAR_EXTENSION)
}

/// Parsed sidecar: declared namespaces plus fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmpDocument {
    pub namespaces: BTreeMap<String, String>,
    pub fields: Fields,
}

impl XmpDocument {
    fn namespace_for(&self, prefix: &str) -> Option<&str> {
        self.namespaces
            .get(prefix)
            .map(String::as_str)
            .or_else(|| well_known_namespace(prefix))
    }

    /// Parse an XMP packet. `path` is only used in error messages.
    pub fn parse(path: &Path, packet: &str) -> Result<Self, StoreError> {
        let malformed = |reason: String| StoreError::Malformed {
            path: path.to_path_buf(),
            reason,
        };
        let unsupported = |reason: String| StoreError::Unsupported {
            path: path.to_path_buf(),
            reason,
        };

        let mut doc = XmpDocument::default();
        let mut reader = Reader::from_str(packet);
        let mut in_description = false;
        // (qname, field id) of the property being read.
        let mut prop: Option<(String, String)> = None;
        let mut prop_text = String::new();
        let mut container: Option<(ListKind, Vec<ListItem>)> = None;
        let mut item: Option<ListItem> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| malformed(e.to_string()))?;
            match event {
                Event::Start(e) => {
                    let name = qname(&e);
                    if name == "rdf:Description" && prop.is_none() {
                        in_description = true;
                        doc.read_description_attrs(&e)
                            .map_err(malformed)?;
                    } else if !in_description {
                        continue;
                    } else if prop.is_none() {
                        let id = field_id_for(&name)
                            .ok_or_else(|| malformed(format!("property without prefix: {name}")))?;
                        refuse_attrs(&e, &name).map_err(|r| r.into_error(path))?;
                        prop = Some((name, id));
                        prop_text.clear();
                    } else if container.is_none() {
                        let kind = list_kind(&name).ok_or_else(|| {
                            unsupported(format!("{name} inside {}", prop_name(&prop)))
                        })?;
                        refuse_attrs(&e, &name).map_err(|r| r.into_error(path))?;
                        container = Some((kind, Vec::new()));
                    } else if item.is_none() && name == "rdf:li" {
                        let lang = item_lang(&e).map_err(|r| r.into_error(path))?;
                        item = Some(ListItem {
                            value: String::new(),
                            lang,
                        });
                    } else {
                        return Err(unsupported(format!(
                            "nested {name} inside {}",
                            prop_name(&prop)
                        )));
                    }
                }
                Event::Empty(e) => {
                    let name = qname(&e);
                    if name == "rdf:Description" && prop.is_none() {
                        doc.read_description_attrs(&e)
                            .map_err(malformed)?;
                    } else if !in_description {
                        continue;
                    } else if prop.is_none() {
                        let id = field_id_for(&name)
                            .ok_or_else(|| malformed(format!("property without prefix: {name}")))?;
                        refuse_attrs(&e, &name).map_err(|r| r.into_error(path))?;
                        doc.fields.insert(id, FieldValue::Text(String::new()));
                    } else if container.is_none() {
                        let kind = list_kind(&name).ok_or_else(|| {
                            unsupported(format!("{name} inside {}", prop_name(&prop)))
                        })?;
                        refuse_attrs(&e, &name).map_err(|r| r.into_error(path))?;
                        container = Some((kind, Vec::new()));
                    } else if item.is_none() && name == "rdf:li" {
                        let lang = item_lang(&e).map_err(|r| r.into_error(path))?;
                        if let Some((_, items)) = container.as_mut() {
                            items.push(ListItem {
                                value: String::new(),
                                lang,
                            });
                        }
                    } else {
                        return Err(unsupported(format!(
                            "nested {name} inside {}",
                            prop_name(&prop)
                        )));
                    }
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| malformed(e.to_string()))?;
                    if let Some(item) = item.as_mut() {
                        item.value.push_str(&text);
                    } else if prop.is_some() && container.is_none() {
                        prop_text.push_str(&text);
                    }
                }
                Event::CData(c) => {
                    let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                    if let Some(item) = item.as_mut() {
                        item.value.push_str(&text);
                    } else if prop.is_some() && container.is_none() {
                        prop_text.push_str(&text);
                    }
                }
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    if name == "rdf:li" && item.is_some() {
                        if let (Some(done), Some((_, items))) = (item.take(), container.as_mut()) {
                            items.push(done);
                        }
                    } else if prop.as_ref().is_some_and(|(q, _)| *q == name) {
                        if let Some((_, id)) = prop.take() {
                            let value = match container.take() {
                                Some((kind, items)) => FieldValue::List { kind, items },
                                None => FieldValue::Text(std::mem::take(&mut prop_text)),
                            };
                            doc.fields.insert(id, value);
                        }
                    } else if name == "rdf:Description" && prop.is_none() {
                        in_description = false;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if prop.is_some() {
            return Err(malformed(format!("unterminated {}", prop_name(&prop))));
        }
        Ok(doc)
    }

    fn read_description_attrs(&mut self, e: &BytesStart<'_>) -> Result<(), String> {
        for attr in e.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| e.to_string())?
                .into_owned();
            if let Some(prefix) = key.strip_prefix("xmlns:") {
                if prefix != "rdf" {
                    self.namespaces.insert(prefix.to_string(), value);
                }
            } else if key == "rdf:about" || key == "xmlns" {
                continue;
            } else if let Some(id) = field_id_for(&key) {
                self.fields.insert(id, FieldValue::Text(value));
            }
        }
        Ok(())
    }

    /// Serialize as a standalone XMP packet.
    pub fn to_packet(&self) -> Result<String, StoreError> {
        let mut prefixes = BTreeSet::new();
        for id in self.fields.keys() {
            let (prefix, _) = split_field_id(id)?;
            prefixes.insert(prefix);
        }

        let mut out = String::new();
        out.push_str("<?xpacket begin=\"\u{feff}\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>\n");
        let _ = writeln!(
            out,
            "<x:xmpmeta xmlns:x=\"adobe:ns:meta/\" x:xmptk=\"{} {}\">",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        let _ = writeln!(out, " <rdf:RDF xmlns:rdf=\"{RDF_NS}\">");
        out.push_str("  <rdf:Description rdf:about=\"\"");
        for prefix in &prefixes {
            let uri = self
                .namespace_for(prefix)
                .ok_or_else(|| StoreError::UnknownNamespace(prefix.to_string()))?;
            let _ = write!(out, "\n    xmlns:{prefix}=\"{}\"", escape(uri));
        }
        out.push_str(">\n");

        for (id, value) in &self.fields {
            let (prefix, name) = split_field_id(id)?;
            match value {
                FieldValue::Text(text) => {
                    let _ = writeln!(out, "   <{prefix}:{name}>{}</{prefix}:{name}>", escape(text));
                }
                FieldValue::List { kind, items } => {
                    let tag = match kind {
                        ListKind::Bag => "rdf:Bag",
                        ListKind::Seq => "rdf:Seq",
                        ListKind::Alt => "rdf:Alt",
                    };
                    let _ = writeln!(out, "   <{prefix}:{name}>");
                    let _ = writeln!(out, "    <{tag}>");
                    for item in items {
                        match &item.lang {
                            Some(lang) => {
                                let _ = writeln!(
                                    out,
                                    "     <rdf:li xml:lang=\"{}\">{}</rdf:li>",
                                    escape(lang.as_str()),
                                    escape(item.value.as_str())
                                );
                            }
                            None => {
                                let _ = writeln!(
                                    out,
                                    "     <rdf:li>{}</rdf:li>",
                                    escape(item.value.as_str())
                                );
                            }
                        }
                    }
                    let _ = writeln!(out, "    </{tag}>");
                    let _ = writeln!(out, "   </{prefix}:{name}>");
                }
            }
        }

        out.push_str("  </rdf:Description>\n");
        out.push_str(" </rdf:RDF>\n");
        out.push_str("</x:xmpmeta>\n");
        out.push_str("<?xpacket end=\"w\"?>\n");
        Ok(out)
    }
}

fn qname(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Why an element's attributes can't be kept.
enum AttrRefusal {
    Unsupported(String),
    Malformed(String),
}

impl AttrRefusal {
    fn into_error(self, path: &Path) -> StoreError {
        let path = path.to_path_buf();
        match self {
            AttrRefusal::Unsupported(reason) => StoreError::Unsupported { path, reason },
            AttrRefusal::Malformed(reason) => StoreError::Malformed { path, reason },
        }
    }
}

/// Property and container elements carry no attributes the model can hold
/// (`rdf:resource`, `rdf:parseType`, qualifiers, ...).
fn refuse_attrs(e: &BytesStart<'_>, name: &str) -> Result<(), AttrRefusal> {
    match e.attributes().next() {
        None => Ok(()),
        Some(Err(err)) => Err(AttrRefusal::Malformed(err.to_string())),
        Some(Ok(attr)) => Err(AttrRefusal::Unsupported(format!(
            "attribute {} on {name}",
            String::from_utf8_lossy(attr.key.as_ref())
        ))),
    }
}

/// `xml:lang` of an `rdf:li`; any other attribute is refused.
fn item_lang(e: &BytesStart<'_>) -> Result<Option<String>, AttrRefusal> {
    let mut lang = None;
    for attr in e.attributes() {
        let attr = attr.map_err(|err| AttrRefusal::Malformed(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if key != "xml:lang" {
            return Err(AttrRefusal::Unsupported(format!("attribute {key} on rdf:li")));
        }
        let value = attr
            .unescape_value()
            .map_err(|err| AttrRefusal::Malformed(err.to_string()))?;
        lang = Some(value.into_owned());
    }
    Ok(lang)
}

fn prop_name(prop: &Option<(String, String)>) -> &str {
    prop.as_ref().map(|(q, _)| q.as_str()).unwrap_or("<none>")
}

/// `dc:subject` → `Xmp.dc.subject`.
fn field_id_for(qname: &str) -> Option<String> {
    let (prefix, name) = qname.split_once(':')?;
    (!prefix.is_empty() && !name.is_empty()).then(|| format!("Xmp.{prefix}.{name}"))
}

fn list_kind(qname: &str) -> Option<ListKind> {
    match qname {
        "rdf:Bag" => Some(ListKind::Bag),
        "rdf:Seq" => Some(ListKind::Seq),
        "rdf:Alt" => Some(ListKind::Alt),
        _ => None,
    }
}

/// Store backed by `.xmp` sidecar files. Images themselves are never opened.
///
/// In dry-run mode existing sidecars are still read and validated, and every commit
/// still serializes the packet; only the final write is skipped.
#[derive(Debug, Default)]
pub struct XmpSidecarStore {
    staged: HashMap<PathBuf, XmpDocument>,
    dry_run: bool,
}

impl XmpSidecarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    fn load(image: &Path) -> Result<XmpDocument, StoreError> {
        let path = sidecar_path(image);
        match std::fs::read_to_string(&path) {
            Ok(packet) => XmpDocument::parse(&path, &packet),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(XmpDocument::default()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn staged_doc(&mut self, image: &Path) -> Result<&mut XmpDocument, StoreError> {
        if !self.staged.contains_key(image) {
            let doc = Self::load(image)?;
            self.staged.insert(image.to_path_buf(), doc);
        }
        self.staged
            .get_mut(image)
            .ok_or_else(|| StoreError::NotOpen(image.to_path_buf()))
    }
}

impl MetadataStore for XmpSidecarStore {
    fn read_fields(&mut self, image: &Path) -> Result<Fields, StoreError> {
        Ok(self.staged_doc(image)?.fields.clone())
    }

    fn write_field(
        &mut self,
        image: &Path,
        field_id: &str,
        values: Vec<String>,
    ) -> Result<(), StoreError> {
        let (prefix, _) = split_field_id(field_id)?;
        let doc = self.staged_doc(image)?;
        if doc.namespace_for(prefix).is_none() {
            return Err(StoreError::UnknownNamespace(prefix.to_string()));
        }
        doc.fields.insert(
            field_id.to_string(),
            FieldValue::plain_list(ListKind::Bag, values),
        );
        Ok(())
    }

    fn commit(&mut self, image: &Path) -> Result<(), StoreError> {
        let doc = self
            .staged
            .remove(image)
            .ok_or_else(|| StoreError::NotOpen(image.to_path_buf()))?;
        let path = sidecar_path(image);
        let packet = doc.to_packet()?;
        if self.dry_run {
            log::debug!("Dry run: not writing {}", path.display());
            return Ok(());
        }
        write_atomic(&path, packet.as_bytes()).map_err(|e| StoreError::Commit {
            path,
            reason: format!("{e:#}"),
        })
    }

    fn abort(&mut self, image: &Path) {
        self.staged.remove(image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subjects(doc: &XmpDocument) -> Vec<String> {
        doc.fields
            .get("Xmp.dc.subject")
            .and_then(FieldValue::as_list)
            .unwrap_or_default()
    }

    #[test]
    fn packet_round_trip_keeps_order_and_escapes() {
        let mut doc = XmpDocument::default();
        doc.fields.insert(
            "Xmp.dc.subject".to_string(),
            FieldValue::plain_list(
                ListKind::Bag,
                vec!["b & c".into(), "<a>".into(), " spaced ".into()],
            ),
        );
        let packet = doc.to_packet().unwrap();
        assert!(packet.contains("b &amp; c"));
        let parsed = XmpDocument::parse(Path::new("t.xmp"), &packet).unwrap();
        assert_eq!(subjects(&parsed), vec!["b & c", "<a>", " spaced "]);
    }

    #[test]
    fn parse_keeps_foreign_fields_and_namespaces() {
        let packet = r#"<x:xmpmeta xmlns:x="adobe:ns:meta/">
 <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about="" xmlns:foo="http://example.com/foo/" foo:rating="5">
   <foo:tags><rdf:Seq><rdf:li>x</rdf:li><rdf:li>y</rdf:li></rdf:Seq></foo:tags>
   <foo:label>Red</foo:label>
  </rdf:Description>
 </rdf:RDF>
</x:xmpmeta>"#;
        let doc = XmpDocument::parse(Path::new("t.xmp"), packet).unwrap();
        assert_eq!(
            doc.namespaces.get("foo").map(String::as_str),
            Some("http://example.com/foo/")
        );
        assert_eq!(
            doc.fields.get("Xmp.foo.rating"),
            Some(&FieldValue::Text("5".into()))
        );
        assert_eq!(
            doc.fields.get("Xmp.foo.tags"),
            Some(&FieldValue::plain_list(
                ListKind::Seq,
                vec!["x".into(), "y".into()],
            ))
        );
        assert_eq!(
            doc.fields.get("Xmp.foo.label"),
            Some(&FieldValue::Text("Red".into()))
        );

        let reparsed = XmpDocument::parse(Path::new("t.xmp"), &doc.to_packet().unwrap()).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn parse_refuses_nested_structures() {
        let packet = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about="" xmlns:xmpMM="http://ns.adobe.com/xap/1.0/mm/">
   <xmpMM:History><rdf:Seq><rdf:li><rdf:Description/></rdf:li></rdf:Seq></xmpMM:History>
  </rdf:Description>
 </rdf:RDF>"#;
        let err = XmpDocument::parse(Path::new("t.xmp"), packet).unwrap_err();
        assert!(matches!(err, StoreError::Unsupported { .. }));
    }

    #[test]
    fn alt_items_keep_their_language() {
        let packet = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
   <dc:title><rdf:Alt>
    <rdf:li xml:lang="x-default">Cat</rdf:li>
    <rdf:li xml:lang="fr-FR">Chat</rdf:li>
   </rdf:Alt></dc:title>
  </rdf:Description>
 </rdf:RDF>"#;
        let doc = XmpDocument::parse(Path::new("t.xmp"), packet).unwrap();
        let expected = FieldValue::List {
            kind: ListKind::Alt,
            items: vec![
                ListItem::with_lang("Cat", "x-default"),
                ListItem::with_lang("Chat", "fr-FR"),
            ],
        };
        assert_eq!(doc.fields.get("Xmp.dc.title"), Some(&expected));

        let written = doc.to_packet().unwrap();
        assert!(written.contains(r#"<rdf:li xml:lang="fr-FR">Chat</rdf:li>"#));
        let reparsed = XmpDocument::parse(Path::new("t.xmp"), &written).unwrap();
        assert_eq!(reparsed.fields.get("Xmp.dc.title"), Some(&expected));
    }

    #[test]
    fn parse_refuses_resource_property() {
        let packet = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
   <dc:source rdf:resource="http://example.com/original.jpg"/>
  </rdf:Description>
 </rdf:RDF>"#;
        let err = XmpDocument::parse(Path::new("t.xmp"), packet).unwrap_err();
        assert!(matches!(err, StoreError::Unsupported { .. }));
    }

    #[test]
    fn parse_refuses_qualifiers_other_than_lang() {
        let on_item = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
   <dc:subject><rdf:Bag><rdf:li rdf:resource="http://example.com/tag"/></rdf:Bag></dc:subject>
  </rdf:Description>
 </rdf:RDF>"#;
        assert!(matches!(
            XmpDocument::parse(Path::new("t.xmp"), on_item),
            Err(StoreError::Unsupported { .. })
        ));

        let on_property = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
   <dc:rights xml:lang="en">All rights reserved</dc:rights>
  </rdf:Description>
 </rdf:RDF>"#;
        assert!(matches!(
            XmpDocument::parse(Path::new("t.xmp"), on_property),
            Err(StoreError::Unsupported { .. })
        ));
    }

    #[test]
    fn dry_run_commit_validates_but_does_not_write() {
        let dir = tempfile::TempDir::new().unwrap();
        let image = dir.path().join("cat.jpg");
        let mut store = XmpSidecarStore::dry_run();
        store
            .write_field(&image, "Xmp.dc.subject", vec!["tabby".into()])
            .unwrap();
        store.commit(&image).unwrap();
        assert!(!sidecar_path(&image).exists());

        store
            .write_field(&image, "Xmp.nope.thing", vec!["x".into()])
            .unwrap_err();
    }

    #[test]
    fn to_packet_rejects_unknown_prefix() {
        let mut doc = XmpDocument::default();
        doc.fields
            .insert("Xmp.nope.thing".into(), FieldValue::Text("v".into()));
        assert!(matches!(
            doc.to_packet(),
            Err(StoreError::UnknownNamespace(p)) if p == "nope"
        ));
    }
}
