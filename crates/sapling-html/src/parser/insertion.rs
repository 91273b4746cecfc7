//! [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)

use sapling_dom::{AttributesMap, ElementData, Namespace, NodeData, NodeId};

use super::core::{HTMLParser, InsertionMode};
use crate::tokenizer::{Attribute, Token, TokenizerState};

/// Where a node goes: inside `parent`, before `before` or at the end.
pub(super) type InsertionLocation = (NodeId, Option<NodeId>);

impl HTMLParser {
    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "The appropriate place for inserting a node, optionally using a
    /// particular override target"
    pub(super) fn appropriate_place_for_inserting(
        &self,
        override_target: Option<NodeId>,
    ) -> InsertionLocation {
        // STEP 1: "If there was an override target specified, then let target
        //          be the override target. Otherwise, let target be the
        //          current node."
        let target = override_target
            .or_else(|| self.current_node())
            .unwrap_or(NodeId::ROOT);

        // STEP 2: "Determine the adjusted insertion location"
        let (parent, before) = if self.foster_parenting
            && self.is_html_element_in(target, &["table", "tbody", "tfoot", "thead", "tr"])
        {
            self.foster_parent_location()
        } else {
            (target, None)
        };

        // STEP 3: "If the adjusted insertion location is inside a template
        //          element, let it instead be inside the template element's
        //          template contents, after its last child (if any)."
        if self.is_html_element(parent, "template")
            && let Some(contents) = self.tree.template_contents(parent)
        {
            return (contents, None);
        }

        (parent, before)
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    ///
    /// The foster parenting branch of the appropriate place for inserting a
    /// node.
    fn foster_parent_location(&self) -> InsertionLocation {
        let stack = &self.stack_of_open_elements;

        // STEP 2.1: "Let last template be the last template element in the
        //            stack of open elements, if any."
        let last_template = stack
            .iter()
            .rposition(|&id| self.is_html_element(id, "template"));

        // STEP 2.2: "Let last table be the last table element in the stack of
        //            open elements, if any."
        let last_table = stack
            .iter()
            .rposition(|&id| self.is_html_element(id, "table"));

        // STEP 2.3: "If there is a last template and either there is no last
        //            table, or there is one, but last template is lower
        //            (more recently added) than last table in the stack of
        //            open elements, then: let adjusted insertion location be
        //            inside last template's template contents"
        if let Some(template_index) = last_template
            && last_table.is_none_or(|table_index| template_index > table_index)
        {
            let template = stack[template_index];
            return (
                self.tree.template_contents(template).unwrap_or(template),
                None,
            );
        }

        // STEP 2.4: "If there is no last table, then let adjusted insertion
        //            location be inside the first element in the stack of open
        //            elements (the html element), after its last child"
        let Some(table_index) = last_table else {
            return (stack.first().copied().unwrap_or(NodeId::ROOT), None);
        };
        let table = stack[table_index];

        // STEP 2.5: "If last table has a parent node, then let adjusted
        //            insertion location be inside last table's parent node,
        //            immediately before last table"
        if let Some(parent) = self.tree.parent(table) {
            return (parent, Some(table));
        }

        // STEP 2.6-2.7: "Let previous element be the element immediately
        //                above last table in the stack of open elements. Let
        //                adjusted insertion location be inside previous
        //                element, after its last child"
        let previous = table_index
            .checked_sub(1)
            .map_or(NodeId::ROOT, |index| stack[index]);
        (previous, None)
    }

    /// Insert `node` at `location`.
    pub(super) fn insert_at(&mut self, location: InsertionLocation, node: NodeId) {
        match location {
            (parent, Some(before)) => self.tree.insert_before(parent, node, before),
            (parent, None) => self.tree.append_child(parent, node),
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// "Create an element for a token"
    ///
    /// Attributes keep their first value when a name repeats. A `template`
    /// element gets its template contents fragment here.
    pub(super) fn create_element_for_token(
        &mut self,
        name: &str,
        attributes: &[Attribute],
        namespace: Namespace,
    ) -> NodeId {
        let mut attrs = AttributesMap::with_capacity(attributes.len());
        for attribute in attributes {
            let _ = attrs
                .entry(attribute.name.clone())
                .or_insert_with(|| attribute.value.clone());
        }

        let mut element = ElementData::new(name, namespace, attrs);
        if namespace == Namespace::Html && name == "template" {
            element.template_contents = Some(self.tree.alloc(NodeData::DocumentFragment));
        }
        self.tree.alloc(NodeData::Element(element))
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// "Insert a foreign element": create the element, insert it at the
    /// appropriate place and push it onto the stack of open elements.
    pub(super) fn insert_foreign_element(
        &mut self,
        name: &str,
        attributes: &[Attribute],
        namespace: Namespace,
    ) -> NodeId {
        // STEP 1: "Let the adjusted insertion location be the appropriate
        //          place for inserting a node."
        let location = self.appropriate_place_for_inserting(None);

        // STEP 2: "Let element be the result of creating an element for the
        //          token in the given namespace"
        let element = self.create_element_for_token(name, attributes, namespace);

        // STEP 3: "If onlyAddToElementStack is false, then run insert an
        //          element at the adjusted insertion location with element."
        self.insert_at(location, element);

        // STEP 4: "Push element onto the stack of open elements so that it is
        //          the new current node."
        self.stack_of_open_elements.push(element);
        element
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "Insert an HTML element for the token." Tokens other than start tags
    /// insert nothing.
    pub(super) fn insert_html_element(&mut self, token: &Token) -> Option<NodeId> {
        match token {
            Token::StartTag {
                name, attributes, ..
            } => Some(self.insert_foreign_element(name, attributes, Namespace::Html)),
            _ => None,
        }
    }

    /// Insert an HTML element for a start tag named `name` with no
    /// attributes, as the algorithm does for implied elements.
    pub(super) fn insert_html_element_named(&mut self, name: &str) -> NodeId {
        self.insert_foreign_element(name, &[], Namespace::Html)
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    pub(super) fn insert_character(&mut self, c: char) {
        // STEP 2: "Let the adjusted insertion location be the appropriate place
        //          for inserting a node."
        let (parent, before) = self.appropriate_place_for_inserting(None);

        // STEP 3: "If the adjusted insertion location is in a Document node,
        //          then return."
        if parent == NodeId::ROOT {
            return;
        }

        // STEP 4: "If there is a Text node immediately before the adjusted
        //          insertion location, then append data to that Text node's
        //          data. Otherwise, create a new Text node"
        let mut buffer = [0; 4];
        let _ = self
            .tree
            .insert_text(parent, before, c.encode_utf8(&mut buffer));
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    ///
    /// Insert a comment at the appropriate place.
    pub(super) fn insert_comment(&mut self, data: &str) {
        let location = self.appropriate_place_for_inserting(None);
        let comment = self.tree.alloc(NodeData::Comment(data.to_string()));
        self.insert_at(location, comment);
    }

    /// Insert a comment as the last child of `parent` (the Document, or the
    /// `html` element in "after body").
    pub(super) fn insert_comment_as_last_child_of(&mut self, parent: NodeId, data: &str) {
        let comment = self.tree.alloc(NodeData::Comment(data.to_string()));
        self.tree.append_child(parent, comment);
    }

    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// "The generic raw text element parsing algorithm and the generic RCDATA
    /// element parsing algorithm consist of the following steps."
    pub(super) fn parse_text_only_element(&mut self, token: &Token, state: TokenizerState) {
        // STEP 1: "Insert an HTML element for the token."
        let _ = self.insert_html_element(token);

        // STEP 2: "If the algorithm that was invoked is the generic raw text
        //          element parsing algorithm, switch the tokenizer to the
        //          RAWTEXT state; otherwise ... switch the tokenizer to the
        //          RCDATA state."
        self.request_tokenizer_state(state);

        // STEP 3: "Let the original insertion mode be the current insertion
        //          mode."
        self.original_insertion_mode = Some(self.insertion_mode);

        // STEP 4: "Then, switch the insertion mode to "text"."
        self.switch_to(InsertionMode::Text);
    }

    /// "generic raw text element parsing algorithm"
    pub(super) fn parse_raw_text_element(&mut self, token: &Token) {
        self.parse_text_only_element(token, TokenizerState::RAWTEXT);
    }

    /// "generic RCDATA element parsing algorithm"
    pub(super) fn parse_rcdata_element(&mut self, token: &Token) {
        self.parse_text_only_element(token, TokenizerState::RCDATA);
    }

    /// Copy attributes from a repeated `html` or `body` start tag onto an
    /// existing element, keeping values already present.
    pub(super) fn merge_attributes_into(&mut self, element: NodeId, attributes: &[Attribute]) {
        if let Some(data) = self.tree.as_element_mut(element) {
            for attribute in attributes {
                if !data.has_attribute(&attribute.name) {
                    data.set_attribute(&attribute.name, &attribute.value);
                }
            }
        }
    }
}
