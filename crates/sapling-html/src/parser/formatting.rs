//! The list of active formatting elements and the adoption agency algorithm.

use sapling_dom::{Namespace, NodeId};

use super::core::{ActiveFormattingElement, HTMLParser};
use super::elements::is_special;
use crate::error::ParseErrorKind;
use crate::tokenizer::Token;

/// "If outer loop counter is greater than or equal to 8, then return."
const ADOPTION_AGENCY_OUTER_LOOP_LIMIT: usize = 8;

/// "If inner loop counter is greater than 3 and node is in the list of
/// active formatting elements, then remove node from the list"
const ADOPTION_AGENCY_INNER_LOOP_LIMIT: usize = 3;

/// Outcome of running the adoption agency algorithm for an end tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AdoptionOutcome {
    /// The end tag was fully handled.
    Handled,
    /// "act as described in the "any other end tag" entry"
    AnyOtherEndTag,
}

impl HTMLParser {
    /// Index in the list of active formatting elements holding `node`.
    pub(super) fn formatting_position(&self, node: NodeId) -> Option<usize> {
        self.active_formatting_elements
            .iter()
            .position(|entry| entry.node_id() == Some(node))
    }

    /// The last HTML element named `name` between the end of the list of
    /// active formatting elements and the last marker.
    pub(super) fn formatting_element_after_last_marker(&self, name: &str) -> Option<NodeId> {
        self.active_formatting_elements
            .iter()
            .rev()
            .map_while(ActiveFormattingElement::node_id)
            .find(|&id| self.is_html_element(id, name))
    }

    pub(super) fn remove_from_formatting_list(&mut self, node: NodeId) {
        if let Some(index) = self.formatting_position(node) {
            let _ = self.active_formatting_elements.remove(index);
        }
    }

    /// Insert a marker at the end of the list of active formatting elements.
    pub(super) fn insert_marker(&mut self) {
        self.active_formatting_elements
            .push(ActiveFormattingElement::Marker);
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "Push onto the list of active formatting elements", including the
    /// Noah's Ark clause.
    pub(super) fn push_active_formatting_element(&mut self, node_id: NodeId, token: &Token) {
        // STEP 1: "If there are already three elements in the list of active
        //          formatting elements after the last marker, if any, or
        //          anywhere in the list if there are no markers, that have the
        //          same tag name, namespace, and attributes as element, then
        //          remove the earliest such element from the list of active
        //          formatting elements."
        if let Some(element) = self.tree.as_element(node_id) {
            let matching: Vec<usize> = self
                .active_formatting_elements
                .iter()
                .enumerate()
                .rev()
                .map_while(|(index, entry)| entry.node_id().map(|id| (index, id)))
                .filter(|&(_, id)| {
                    self.tree.as_element(id).is_some_and(|other| {
                        other.tag_name == element.tag_name
                            && other.namespace == element.namespace
                            && other.attrs() == element.attrs()
                    })
                })
                .map(|(index, _)| index)
                .collect();

            if matching.len() >= 3
                && let Some(&earliest) = matching.last()
            {
                let _ = self.active_formatting_elements.remove(earliest);
            }
        }

        // STEP 2: "Add element to the list of active formatting elements."
        self.active_formatting_elements
            .push(ActiveFormattingElement::Element {
                node_id,
                token: token.clone(),
            });
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// "Reconstruct the active formatting elements, if any."
    pub(super) fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1: "If there are no entries in the list of active formatting
        //          elements, then there is nothing to reconstruct; stop this
        //          algorithm."
        // STEP 2: "If the last (most recently added) entry in the list of
        //          active formatting elements is a marker, or if it is an
        //          element that is in the stack of open elements, then there
        //          is nothing to reconstruct; stop this algorithm."
        let is_open_or_marker = |parser: &Self, index: usize| {
            parser.active_formatting_elements[index]
                .node_id()
                .is_none_or(|id| parser.stack_position(id).is_some())
        };
        let Some(mut index) = self.active_formatting_elements.len().checked_sub(1) else {
            return;
        };
        if is_open_or_marker(self, index) {
            return;
        }

        // STEP 4-6: "Rewind: If there are no entries before entry in the list
        //            of active formatting elements, then jump to the step
        //            labeled create. Let entry be the entry one earlier than
        //            entry in the list of active formatting elements. If entry
        //            is neither a marker nor an element that is also in the
        //            stack of open elements, go to the step labeled rewind."
        while index > 0 {
            if is_open_or_marker(self, index - 1) {
                break;
            }
            index -= 1;
        }

        // STEP 7-10: "Advance / Create: Insert an HTML element for the token
        //             for which the element entry was created, to obtain new
        //             element. Replace the entry for entry in the list with an
        //             entry for new element. If the entry for new element in
        //             the list of active formatting elements is not the last
        //             entry in the list, return to the step labeled advance."
        for position in index..self.active_formatting_elements.len() {
            let ActiveFormattingElement::Element { token, .. } =
                self.active_formatting_elements[position].clone()
            else {
                continue;
            };
            if let Some(new_element) = self.insert_html_element(&token) {
                self.active_formatting_elements[position] = ActiveFormattingElement::Element {
                    node_id: new_element,
                    token,
                };
            }
        }
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    pub(super) fn clear_active_formatting_elements_to_last_marker(&mut self) {
        while let Some(entry) = self.active_formatting_elements.pop() {
            if matches!(entry, ActiveFormattingElement::Marker) {
                break;
            }
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// "The adoption agency algorithm, which takes as its only argument a
    /// token token for which the algorithm is being run"
    pub(super) fn run_adoption_agency(&mut self, subject: &str) -> AdoptionOutcome {
        // STEP 2: "If the current node is an HTML element whose tag name is
        //          subject, and the current node is not in the list of active
        //          formatting elements, then pop the current node off the stack
        //          of open elements and return."
        if let Some(current) = self.current_node()
            && self.is_html_element(current, subject)
            && self.formatting_position(current).is_none()
        {
            let _ = self.pop_current_node();
            return AdoptionOutcome::Handled;
        }

        // STEP 3-4: "Let outer loop counter be 0. While true:"
        for _ in 0..ADOPTION_AGENCY_OUTER_LOOP_LIMIT {
            // STEP 4.3: "Let formatting element be the last element in the list
            //            of active formatting elements that: is between the end
            //            of the list and the last marker in the list, if any,
            //            or the start of the list otherwise, and has the tag
            //            name subject. If there is no such element, then return
            //            and instead act as described in the "any other end
            //            tag" entry above."
            let Some(formatting_element) = self.formatting_element_after_last_marker(subject)
            else {
                return AdoptionOutcome::AnyOtherEndTag;
            };

            // STEP 4.4: "If formatting element is not in the stack of open
            //            elements, then this is a parse error; remove the
            //            element from the list, and return."
            let Some(formatting_index) = self.stack_position(formatting_element) else {
                self.parse_error(ParseErrorKind::FormattingElementNotOpen);
                self.remove_from_formatting_list(formatting_element);
                return AdoptionOutcome::Handled;
            };

            // STEP 4.5: "If formatting element is in the stack of open
            //            elements, but the element is not in scope, then this
            //            is a parse error; return."
            if !self.has_node_in_scope(formatting_element) {
                self.parse_error(ParseErrorKind::FormattingElementNotInScope);
                return AdoptionOutcome::Handled;
            }

            // STEP 4.6: "If formatting element is not the current node, this
            //            is a parse error. (But do not return.)"
            if self.current_node() != Some(formatting_element) {
                self.parse_error(ParseErrorKind::MisnestedFormattingElement);
            }

            // STEP 4.7: "Let furthest block be the topmost node in the stack of
            //            open elements that is lower in the stack than
            //            formatting element, and is an element in the special
            //            category."
            let furthest_block = self.stack_of_open_elements[formatting_index + 1..]
                .iter()
                .copied()
                .find(|&id| self.tree.as_element(id).is_some_and(is_special));

            // STEP 4.8: "If there is no furthest block, then the UA must first
            //            pop all the nodes from the bottom of the stack of open
            //            elements, from the current node up to and including
            //            formatting element, then remove formatting element
            //            from the list of active formatting elements, and
            //            finally return."
            let Some(furthest_block) = furthest_block else {
                self.stack_of_open_elements.truncate(formatting_index);
                self.remove_from_formatting_list(formatting_element);
                return AdoptionOutcome::Handled;
            };

            // STEP 4.9: "Let common ancestor be the element immediately above
            //            formatting element in the stack of open elements."
            let common_ancestor = formatting_index
                .checked_sub(1)
                .map_or(NodeId::ROOT, |index| self.stack_of_open_elements[index]);

            // STEP 4.10: "Let a bookmark note the position of formatting
            //             element in the list of active formatting elements
            //             relative to the elements on either side of it in the
            //             list."
            let mut bookmark = self.formatting_position(formatting_element).unwrap_or(0);

            // STEP 4.11: "Let node and last node be furthest block."
            let mut node_index = self.stack_position(furthest_block).unwrap_or(formatting_index);
            let mut last_node = furthest_block;

            // STEP 4.12-4.13: "Let inner loop counter be 0. While true:"
            let mut inner_loop_counter = 0;
            loop {
                inner_loop_counter += 1;

                // STEP 4.13.2: "Let node be the element immediately above node
                //               in the stack of open elements, or if node is no
                //               longer in the stack of open elements (e.g.
                //               because it got removed by this algorithm), the
                //               element that was immediately above node in the
                //               stack of open elements before node was removed."
                node_index -= 1;
                let mut node = self.stack_of_open_elements[node_index];

                // STEP 4.13.3: "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 4.13.4: "If inner loop counter is greater than 3 and
                //               node is in the list of active formatting
                //               elements, then remove node from the list of
                //               active formatting elements."
                if inner_loop_counter > ADOPTION_AGENCY_INNER_LOOP_LIMIT
                    && let Some(position) = self.formatting_position(node)
                {
                    let _ = self.active_formatting_elements.remove(position);
                    if position < bookmark {
                        bookmark -= 1;
                    }
                }

                // STEP 4.13.5: "If node is not in the list of active formatting
                //               elements, then remove node from the stack of
                //               open elements and continue."
                let Some(position) = self.formatting_position(node) else {
                    let _ = self.stack_of_open_elements.remove(node_index);
                    continue;
                };

                // STEP 4.13.6: "Create an element for the token for which the
                //               element node was created, in the HTML
                //               namespace, with common ancestor as the intended
                //               parent; replace the entry for node in the list
                //               of active formatting elements with an entry for
                //               the new element, replace the entry for node in
                //               the stack of open elements with an entry for the
                //               new element, and let node be the new element."
                let ActiveFormattingElement::Element { token, .. } =
                    self.active_formatting_elements[position].clone()
                else {
                    break;
                };
                let new_element = self.create_element_from_token(&token);
                self.active_formatting_elements[position] = ActiveFormattingElement::Element {
                    node_id: new_element,
                    token,
                };
                self.stack_of_open_elements[node_index] = new_element;
                node = new_element;

                // STEP 4.13.7: "If last node is furthest block, then move the
                //               aforementioned bookmark to be immediately after
                //               the new node in the list of active formatting
                //               elements."
                if last_node == furthest_block {
                    bookmark = position + 1;
                }

                // STEP 4.13.8: "Append last node to node."
                self.tree.append_child(node, last_node);

                // STEP 4.13.9: "Set last node to node."
                last_node = node;
            }

            // STEP 4.14: "Insert whatever last node ended up being in the
            //             previous step at the appropriate place for inserting
            //             a node, but using common ancestor as the override
            //             target."
            let location = self.appropriate_place_for_inserting(Some(common_ancestor));
            self.insert_at(location, last_node);

            // STEP 4.15: "Create an element for the token for which formatting
            //             element was created, in the HTML namespace, with
            //             furthest block as the intended parent."
            let Some(position) = self.formatting_position(formatting_element) else {
                return AdoptionOutcome::Handled;
            };
            let ActiveFormattingElement::Element { token, .. } =
                self.active_formatting_elements[position].clone()
            else {
                return AdoptionOutcome::Handled;
            };
            let new_element = self.create_element_from_token(&token);

            // STEP 4.16: "Take all of the child nodes of furthest block and
            //             append them to the element created in the last step."
            self.tree.move_children(furthest_block, new_element);

            // STEP 4.17: "Append that new element to furthest block."
            self.tree.append_child(furthest_block, new_element);

            // STEP 4.18: "Remove formatting element from the list of active
            //             formatting elements, and insert the new element into
            //             the list of active formatting elements at the
            //             position of the aforementioned bookmark."
            let _ = self.active_formatting_elements.remove(position);
            if position < bookmark {
                bookmark -= 1;
            }
            let bookmark = bookmark.min(self.active_formatting_elements.len());
            self.active_formatting_elements.insert(
                bookmark,
                ActiveFormattingElement::Element {
                    node_id: new_element,
                    token,
                },
            );

            // STEP 4.19: "Remove formatting element from the stack of open
            //             elements, and insert the new element into the stack
            //             of open elements immediately below the position of
            //             furthest block in that stack."
            self.remove_from_stack(formatting_element);
            let furthest_index = self
                .stack_position(furthest_block)
                .unwrap_or(self.stack_of_open_elements.len() - 1);
            self.stack_of_open_elements
                .insert(furthest_index + 1, new_element);
        }

        AdoptionOutcome::Handled
    }

    /// Create (but do not insert) an HTML element for a stored start tag.
    fn create_element_from_token(&mut self, token: &Token) -> NodeId {
        match token {
            Token::StartTag {
                name, attributes, ..
            } => self.create_element_for_token(name, attributes, Namespace::Html),
            _ => self.create_element_for_token("", &[], Namespace::Html),
        }
    }
}
