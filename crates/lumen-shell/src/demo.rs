//! Demo page the shell attaches the overlay to

use lumen_dom::{Document, DomError, NodeId};

/// Build a small dashboard-like page. Returns it with its hover targets.
pub fn dashboard() -> Result<(Document, Vec<NodeId>), DomError> {
    let mut doc = Document::new("lumen://dashboard");
    let body = doc.body();
    let mut targets = Vec::new();

    let tree = doc.tree_mut();
    let mut add = |parent: NodeId, tag: &str, text: &str| {
        let el = tree.create_element(tag);
        if !text.is_empty() {
            let t = tree.create_text(text);
            tree.append_child(el, t);
        }
        tree.append_child(parent, el);
        el
    };

    targets.push(add(body, "h1", "Dashboard"));
    let nav = add(body, "nav", "");
    targets.push(add(nav, "a", "Campaigns"));
    targets.push(add(nav, "a", "Posts"));
    targets.push(add(body, "p", "Reach grew twelve percent this week."));
    let list = add(body, "ul", "");
    targets.push(add(list, "li", "Spring launch, scheduled"));
    targets.push(add(list, "li", "Newsletter, draft"));
    let publish = add(body, "button", "+");
    targets.push(publish);
    targets.push(add(body, "div", "Layout container"));

    tree.set_attribute(publish, "aria-label", "Publish new post")?;
    doc.take_mutations();
    Ok((doc, targets))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_has_heading_and_targets() {
        let (doc, targets) = dashboard().unwrap();
        assert_eq!(doc.query_first(&["h1", "h2"]), Some(targets[0]));
        assert_eq!(targets.len(), 8);
        assert_eq!(doc.tree().get_attribute(targets[6], "aria-label"), Some("Publish new post"));
    }
}
