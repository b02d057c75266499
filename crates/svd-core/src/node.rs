//! Tree navigation over an already materialized SVD document.

use svd_xml::Element;

use crate::error::SvdError;
use crate::literal::{decode_boolean, decode_integer};
use crate::options::DecodeOptions;

/// Read-only view of a document element, provided by the XML collaborator.
///
/// Implementations must already be namespace-normalized and whitespace
/// trimmed.
pub trait Node {
    /// Local tag name.
    fn node_name(&self) -> &str;
    /// Character content of the element.
    fn text_content(&self) -> &str;
    /// Attribute value by local name.
    fn attribute(&self, name: &str) -> Option<&str>;
    /// Direct child elements in document order.
    fn child_nodes(&self) -> impl Iterator<Item = &Self>;
}

impl Node for Element {
    fn node_name(&self) -> &str {
        self.name()
    }

    fn text_content(&self) -> &str {
        self.text()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        Element::attribute(self, name)
    }

    fn child_nodes(&self) -> impl Iterator<Item = &Self> {
        self.children().iter()
    }
}

/// Direct children of `parent` whose tag is `tag`, in document order.
pub fn children_by_tag<'a, N: Node>(parent: &'a N, tag: &str) -> Vec<&'a N> {
    parent
        .child_nodes()
        .filter(|child| child.node_name() == tag)
        .collect()
}

/// The single direct child tagged `tag`, if any.
///
/// Two or more matches are always an error, never "pick the first".
pub fn single_child_by_tag<'a, N: Node>(
    parent: &'a N,
    tag: &str,
) -> Result<Option<&'a N>, SvdError> {
    let mut matches = parent
        .child_nodes()
        .filter(|child| child.node_name() == tag);
    let first = matches.next();
    if matches.next().is_some() {
        return Err(SvdError::MultipleElements {
            tag: tag.to_string(),
            parent: parent.node_name().to_string(),
        });
    }
    Ok(first)
}

pub(crate) fn expect_kind<N: Node>(node: &N, expected: &'static str) -> Result<(), SvdError> {
    if node.node_name() != expected {
        return Err(SvdError::WrongElementKind {
            expected,
            found: node.node_name().to_string(),
        });
    }
    Ok(())
}

pub(crate) fn required_child<'a, N: Node>(parent: &'a N, tag: &str) -> Result<&'a N, SvdError> {
    single_child_by_tag(parent, tag)?.ok_or_else(|| SvdError::MissingRequiredField {
        tag: tag.to_string(),
        parent: parent.node_name().to_string(),
    })
}

pub(crate) fn optional_text<N: Node>(parent: &N, tag: &str) -> Result<Option<String>, SvdError> {
    Ok(single_child_by_tag(parent, tag)?.map(|child| child.text_content().to_string()))
}

pub(crate) fn required_text<N: Node>(parent: &N, tag: &str) -> Result<String, SvdError> {
    Ok(required_child(parent, tag)?.text_content().to_string())
}

pub(crate) fn optional_int<T, N>(parent: &N, tag: &str) -> Result<Option<T>, SvdError>
where
    T: TryFrom<u64>,
    N: Node,
{
    single_child_by_tag(parent, tag)?
        .map(|child| decode_integer(tag, child.text_content()))
        .transpose()
}

pub(crate) fn required_int<T, N>(parent: &N, tag: &str) -> Result<T, SvdError>
where
    T: TryFrom<u64>,
    N: Node,
{
    decode_integer(tag, required_child(parent, tag)?.text_content())
}

pub(crate) fn optional_bool<N: Node>(
    parent: &N,
    tag: &str,
    options: &DecodeOptions,
) -> Result<Option<bool>, SvdError> {
    single_child_by_tag(parent, tag)?
        .map(|child| decode_boolean(tag, child.text_content(), options.lenient_booleans))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Element {
        svd_xml::parse(
            r#"
            <register>
                <name>CR1</name>
                <fields>
                    <field><name>EN</name></field>
                    <field><name>MODE</name></field>
                </fields>
                <addressOffset>0x10</addressOffset>
                <dim>four</dim>
                <field><name>DIRECT</name></field>
                <alias>A</alias>
                <alias>B</alias>
            </register>
            "#,
        )
        .expect("parse fixture")
    }

    #[test]
    fn children_are_direct_and_ordered() {
        let root = fixture();
        let direct: Vec<_> = children_by_tag(&root, "field")
            .into_iter()
            .map(|f| f.child_nodes().next().map(|n| n.text_content().to_string()))
            .collect();
        assert_eq!(direct, vec![Some("DIRECT".to_string())]);

        let fields = single_child_by_tag(&root, "fields")
            .expect("singleton")
            .expect("present");
        let names: Vec<_> = children_by_tag(fields, "field")
            .into_iter()
            .map(|f| required_text(f, "name").expect("name"))
            .collect();
        assert_eq!(names, vec!["EN", "MODE"]);
        assert!(children_by_tag(&root, "cluster").is_empty());
    }

    #[test]
    fn singleton_lookup_rejects_duplicates() {
        let root = fixture();
        assert!(single_child_by_tag(&root, "size").expect("absent").is_none());
        let err = single_child_by_tag(&root, "alias").unwrap_err();
        assert_eq!(
            err,
            SvdError::MultipleElements {
                tag: "alias".into(),
                parent: "register".into(),
            }
        );
    }

    #[test]
    fn typed_helpers_report_tag() {
        let root = fixture();
        assert_eq!(required_int::<u64, _>(&root, "addressOffset").expect("offset"), 0x10);
        assert_eq!(optional_int::<u32, _>(&root, "size").expect("absent"), None);
        let err = optional_int::<u32, _>(&root, "dim").unwrap_err();
        assert!(matches!(err, SvdError::MalformedIntegerLiteral { ref tag, .. } if tag == "dim"));
        let err = required_text(&root, "description").unwrap_err();
        assert!(matches!(err, SvdError::MissingRequiredField { ref tag, .. } if tag == "description"));
    }

    #[test]
    fn kind_check_names_found_tag() {
        let root = fixture();
        assert!(expect_kind(&root, "register").is_ok());
        let err = expect_kind(&root, "field").unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot build field from a <register> element"
        );
    }
}
