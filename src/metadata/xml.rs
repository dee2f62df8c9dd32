//! Extraction of `<metadata>` values from language manifests.

use std::collections::BTreeMap;

use camino::Utf8Path;
use quick_xml::Reader;
use quick_xml::events::Event;

use super::LanguageMetadata;
use crate::error::MetadataError;

const ROOT_ELEMENT: &str = "metafile";
const METADATA_ELEMENT: &str = "metadata";

/// Parse manifest text read from `path`.
///
/// Every child element of `<metafile><metadata>` becomes one entry; elements
/// elsewhere in the manifest are ignored. Empty elements map to an empty
/// string.
///
/// # Errors
///
/// Returns [`MetadataError::Xml`] for malformed XML and
/// [`MetadataError::InvalidRoot`] when the document is not rooted at
/// `metafile`.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use langpack::metadata::parse_manifest_str;
///
/// let manifest = "<metafile><metadata><tag>en-GB</tag></metadata></metafile>";
/// let metadata = parse_manifest_str(manifest, Utf8Path::new("en-GB.xml"))?;
/// assert_eq!(metadata.tag(), Some("en-GB"));
/// # Ok::<(), langpack::MetadataError>(())
/// ```
pub fn parse_manifest_str(
    source: &str,
    path: &Utf8Path,
) -> Result<LanguageMetadata, MetadataError> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut values = BTreeMap::new();
    let mut saw_root = false;

    loop {
        let event = reader.read_event().map_err(|error| MetadataError::Xml {
            path: path.to_owned(),
            reason: error.to_string(),
        })?;

        match event {
            Event::Start(element) => {
                let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                check_root(&stack, &name, path)?;
                saw_root = true;
                stack.push(name);
            }
            Event::Empty(element) => {
                let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                check_root(&stack, &name, path)?;
                saw_root = true;
                if in_metadata(&stack) {
                    values.entry(name).or_insert_with(String::new);
                }
            }
            Event::Text(text) => {
                if let Some(key) = metadata_child(&stack) {
                    let value = text.unescape().map_err(|error| MetadataError::Xml {
                        path: path.to_owned(),
                        reason: error.to_string(),
                    })?;
                    values.insert(key.to_owned(), value.into_owned());
                }
            }
            Event::CData(data) => {
                if let Some(key) = metadata_child(&stack) {
                    let value = String::from_utf8_lossy(&data).into_owned();
                    values.insert(key.to_owned(), value);
                }
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(MetadataError::InvalidRoot {
            path: path.to_owned(),
            found: String::new(),
        });
    }

    Ok(LanguageMetadata::new(values))
}

fn check_root(stack: &[String], name: &str, path: &Utf8Path) -> Result<(), MetadataError> {
    if stack.is_empty() && name != ROOT_ELEMENT {
        return Err(MetadataError::InvalidRoot {
            path: path.to_owned(),
            found: name.to_owned(),
        });
    }
    Ok(())
}

fn in_metadata(stack: &[String]) -> bool {
    matches!(stack, [root, block] if root == ROOT_ELEMENT && block == METADATA_ELEMENT)
}

fn metadata_child(stack: &[String]) -> Option<&str> {
    match stack {
        [root, block, child] if root == ROOT_ELEMENT && block == METADATA_ELEMENT => {
            Some(child.as_str())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<metafile client="site">
    <name>English (en-GB)</name>
    <metadata>
        <name>English (United Kingdom)</name>
        <tag>en-GB</tag>
        <rtl>0</rtl>
        <locale>en_GB.utf8, en_GB</locale>
        <firstDay>0</firstDay>
        <weekEnd>0,6</weekEnd>
        <calendar/>
        <note>Fish &amp; chips</note>
    </metadata>
    <params />
</metafile>
"#;

    fn parse(source: &str) -> Result<LanguageMetadata, MetadataError> {
        parse_manifest_str(source, Utf8Path::new("en-GB.xml"))
    }

    #[rstest]
    fn reads_metadata_children() {
        let metadata = parse(MANIFEST).unwrap_or_else(|error| panic!("{error}"));

        assert_eq!(metadata.name(), Some("English (United Kingdom)"));
        assert_eq!(metadata.tag(), Some("en-GB"));
        assert_eq!(metadata.weekend(), "0,6");
        assert_eq!(metadata.get("calendar"), Some(""));
        assert_eq!(metadata.get("note"), Some("Fish & chips"));
        assert_eq!(metadata.values().len(), 8);
    }

    #[rstest]
    #[case("<extension><metadata/></extension>", "extension")]
    #[case("<install/>", "install")]
    #[case("", "")]
    fn rejects_foreign_roots(#[case] source: &str, #[case] expected: &str) {
        let error = parse(source).err();

        assert_eq!(
            error,
            Some(MetadataError::InvalidRoot {
                path: "en-GB.xml".into(),
                found: expected.to_owned(),
            })
        );
    }

    #[rstest]
    fn reports_malformed_documents() {
        let error = parse("<metafile><metadata><tag>en-GB</name></metadata></metafile>").err();

        assert!(matches!(error, Some(MetadataError::Xml { .. })), "{error:?}");
    }
}
