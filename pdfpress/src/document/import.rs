//! Object graph import between documents.
//!
//! Objects are copied with freshly allocated ids in the target. Each source
//! object is copied at most once per [`Importer`], so resources shared by
//! several pages stay shared in the output.

use std::collections::{HashMap, VecDeque};

use lopdf::{Dictionary, Document, Object, ObjectId};

pub(crate) struct Importer<'a> {
    source: &'a Document,
    ids: HashMap<ObjectId, ObjectId>,
    queue: VecDeque<(ObjectId, ObjectId)>,
}

impl<'a> Importer<'a> {
    pub(crate) fn new(source: &'a Document) -> Self {
        Self {
            source,
            ids: HashMap::new(),
            queue: VecDeque::new(),
        }
    }

    /// Route references to `old` in the source to `new` in the target.
    pub(crate) fn map(&mut self, old: ObjectId, new: ObjectId) {
        self.ids.insert(old, new);
    }

    /// Rewrite a dictionary for the target and copy everything it reaches.
    pub(crate) fn import_dictionary(
        &mut self,
        target: &mut Document,
        dict: &Dictionary,
    ) -> Dictionary {
        let imported = self.rewrite_dictionary(target, dict);
        self.drain(target);
        imported
    }

    /// Drop the copies of the annotations listed on `page`, so the next
    /// import gives them new ids.
    pub(crate) fn forget_annotations(&mut self, page: &Dictionary) {
        let source = self.source;
        let annots = match page.get(b"Annots") {
            Ok(Object::Reference(id)) => {
                self.ids.remove(id);
                match source.get_object(*id) {
                    Ok(object) => object,
                    Err(_) => return,
                }
            }
            Ok(direct) => direct,
            Err(_) => return,
        };

        if let Ok(items) = annots.as_array() {
            for item in items {
                if let Object::Reference(id) = item {
                    self.ids.remove(id);
                }
            }
        }
    }

    /// Number of source objects copied so far.
    pub(crate) fn copied(&self) -> usize {
        self.ids.len()
    }

    // Worklist instead of recursion over references: reference chains in real
    // files can be arbitrarily long.
    fn drain(&mut self, target: &mut Document) {
        let source = self.source;
        while let Some((old, new)) = self.queue.pop_front() {
            let copied = match source.get_object(old) {
                Ok(object) => self.rewrite(target, object),
                Err(_) => Object::Null,
            };
            target.objects.insert(new, copied);
        }
    }

    fn rewrite(&mut self, target: &mut Document, object: &Object) -> Object {
        match object {
            Object::Reference(id) => self.reference(target, *id),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.rewrite(target, item))
                    .collect(),
            ),
            Object::Dictionary(dict) => Object::Dictionary(self.rewrite_dictionary(target, dict)),
            Object::Stream(stream) => {
                let mut stream = stream.clone();
                stream.dict = self.rewrite_dictionary(target, &stream.dict);
                Object::Stream(stream)
            }
            other => other.clone(),
        }
    }

    fn rewrite_dictionary(&mut self, target: &mut Document, dict: &Dictionary) -> Dictionary {
        let mut rewritten = Dictionary::new();
        for (key, value) in dict.iter() {
            rewritten.set(key.clone(), self.rewrite(target, value));
        }
        rewritten
    }

    fn reference(&mut self, target: &mut Document, id: ObjectId) -> Object {
        if let Some(&new) = self.ids.get(&id) {
            return Object::Reference(new);
        }

        let object = match self.source.get_object(id) {
            Ok(object) => object,
            Err(_) => {
                log::debug!("Dropping dangling reference {} {} R", id.0, id.1);
                return Object::Null;
            }
        };

        // Pages outside this import must not pull in the source page tree.
        if is_page_tree_node(object) {
            return Object::Null;
        }

        let new = target.new_object_id();
        self.ids.insert(id, new);
        self.queue.push_back((id, new));
        Object::Reference(new)
    }
}

fn is_page_tree_node(object: &Object) -> bool {
    object
        .as_dict()
        .and_then(|dict| dict.get(b"Type"))
        .and_then(Object::as_name)
        .is_ok_and(|name| name == b"Page" || name == b"Pages")
}
