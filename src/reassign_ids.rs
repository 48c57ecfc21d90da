//! C10 -- Id Reassigner.
//!
//! Every content node up to this point carries a provisional id: an index
//! into the flat annotation stream, `None` for a synthesized ancestor
//! section, or the `[-1]` dummy-section sentinel. This pass walks the
//! nested tree exactly once to compute each node's final, document-order
//! path id, then walks it a second time to rewrite every reference marker
//! that pointed at a provisional content id.

use std::collections::HashMap;

use crate::model::{Content, ContentId, ReferencedId};

/// Assign final ids and rewrite content-reference markers in place.
pub fn reassign_content_ids(contents: &mut [Content]) {
    let mut old_to_new: HashMap<ContentId, ContentId> = HashMap::new();
    let mut prefix = Vec::new();
    assign_ids(contents, &mut prefix, &mut old_to_new);
    rewrite_markers(contents, &old_to_new);
}

fn assign_ids(contents: &mut [Content], prefix: &mut Vec<i64>, old_to_new: &mut HashMap<ContentId, ContentId>) {
    for (i, content) in contents.iter_mut().enumerate() {
        prefix.push(i as i64);
        let new_id = prefix.clone();

        if let Some(old_id) = content.content_id().cloned() {
            old_to_new.insert(old_id, new_id.clone());
        }
        content.set_content_id(new_id);

        if let Content::Section(section) = content {
            assign_ids(&mut section.contents, prefix, old_to_new);
        }
        prefix.pop();
    }
}

fn rewrite_markers(contents: &mut [Content], old_to_new: &HashMap<ContentId, ContentId>) {
    for content in contents.iter_mut() {
        match content {
            Content::Paragraph(paragraph) => {
                for marker in &mut paragraph.reference_markers {
                    if let Some(ReferencedId::Content(old_id)) = &marker.referenced_id {
                        marker.referenced_id =
                            old_to_new.get(old_id).cloned().map(ReferencedId::Content);
                    }
                }
            }
            Content::Section(section) => rewrite_markers(&mut section.contents, old_to_new),
            Content::Formula(_) | Content::Infographic(_) => {}
        }
    }
}
