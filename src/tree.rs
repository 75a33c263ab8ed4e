//! Syntax trees produced by the parser.
//!
//! Nodes never change once built. Children are shared through [Arc], so cloning a tree is
//! cheap and replacing a child with [NonTerminalNode::with_child] copies only the path to it.

use std::sync::Arc;
use crate::token::{Token, TokenKind};

#[derive(Debug)]
pub enum SyntaxNode<K, V> {
    Terminal(Token<K>),
    NonTerminal(Arc<NonTerminalNode<K, V>>),
    /// An optional clause that did not match.
    Absent,
    /// Every iteration of a repetition, in order.
    Many(Arc<[SyntaxNode<K, V>]>),
    /// A nested sequence or a group, with the group's label if it has one.
    Group {
        label: Option<String>,
        children: Arc<[SyntaxNode<K, V>]>
    }
}

/// One matched alternative of a rule, with the value its action computed.
#[derive(Debug)]
pub struct NonTerminalNode<K, V> {
    pub rule: String,
    /// Index of the alternative in declaration order.
    pub alternative: usize,
    pub children: Vec<SyntaxNode<K, V>>,
    pub value: V
}

impl<K: Clone, V> Clone for SyntaxNode<K, V> {
    fn clone(&self) -> Self {
        match self {
            SyntaxNode::Terminal(token) => SyntaxNode::Terminal(token.clone()),
            SyntaxNode::NonTerminal(node) => SyntaxNode::NonTerminal(node.clone()),
            SyntaxNode::Absent => SyntaxNode::Absent,
            SyntaxNode::Many(items) => SyntaxNode::Many(items.clone()),
            SyntaxNode::Group { label, children } => SyntaxNode::Group {
                label: label.clone(),
                children: children.clone()
            }
        }
    }
}

impl<K: TokenKind, V> SyntaxNode<K, V> {
    pub fn token(&self) -> Option<&Token<K>> {
        match self {
            SyntaxNode::Terminal(token) => Some(token),
            _ => None
        }
    }

    /// Text of a terminal.
    pub fn text(&self) -> Option<&str> {
        self.token().map(|t| t.text.as_str())
    }

    pub fn node(&self) -> Option<&NonTerminalNode<K, V>> {
        match self {
            SyntaxNode::NonTerminal(node) => Some(&**node),
            _ => None
        }
    }

    /// Value computed by a non-terminal's action.
    pub fn value(&self) -> Option<&V> {
        self.node().map(|n| &n.value)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, SyntaxNode::Absent)
    }

    /// Items of a repetition or children of a group; empty for anything else.
    pub fn items(&self) -> &[SyntaxNode<K, V>] {
        match self {
            SyntaxNode::Many(items) => &items[..],
            SyntaxNode::Group { children, .. } => &children[..],
            _ => &[]
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            SyntaxNode::Group { label, .. } => label.as_deref(),
            _ => None
        }
    }

    /// Renders the tree one node per line, children indented by two spaces.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&"  ".repeat(depth));
        match self {
            SyntaxNode::Terminal(token) => out.push_str(&format!("{:?}:{}", token.kind, token.text)),
            SyntaxNode::NonTerminal(node) => {
                out.push_str(&format!("{}#{}", node.rule, node.alternative));
                for child in &node.children {
                    child.dump_into(out, depth + 1);
                }
            }
            SyntaxNode::Absent => out.push_str("<absent>"),
            SyntaxNode::Many(items) => {
                out.push('*');
                for item in items.iter() {
                    item.dump_into(out, depth + 1);
                }
            }
            SyntaxNode::Group { label, children } => {
                out.push_str(&format!("({})", label.as_deref().unwrap_or("")));
                for child in children.iter() {
                    child.dump_into(out, depth + 1);
                }
            }
        }
    }
}

impl<K: Clone, V: Clone> NonTerminalNode<K, V> {
    /// A copy with child `index` replaced, or `None` if there is no such child.
    ///
    /// The other children are shared with `self`. The action is not rerun.
    pub fn with_child(&self, index: usize, child: SyntaxNode<K, V>) -> Option<NonTerminalNode<K, V>> {
        if index >= self.children.len() {
            return None;
        }
        let mut children = self.children.clone();
        children[index] = child;
        Some(NonTerminalNode {
            rule: self.rule.clone(),
            alternative: self.alternative,
            children,
            value: self.value.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Position;

    #[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
    enum T { Num, Plus }

    fn terminal(kind: T, text: &str) -> SyntaxNode<T, i64> {
        SyntaxNode::Terminal(Token::new(kind, text, Position::start()))
    }

    fn sample() -> SyntaxNode<T, i64> {
        SyntaxNode::NonTerminal(Arc::new(NonTerminalNode {
            rule: "sum".to_string(),
            alternative: 1,
            children: vec![
                terminal(T::Num, "1"),
                SyntaxNode::Many(Arc::from(vec![SyntaxNode::Group {
                    label: Some("tail".to_string()),
                    children: Arc::from(vec![terminal(T::Plus, "+"), terminal(T::Num, "2")])
                }])),
                SyntaxNode::Absent
            ],
            value: 3
        }))
    }

    #[test]
    fn dump_format() {
        assert_eq!(
            sample().dump(),
            "sum#1\n  Num:1\n  *\n    (tail)\n      Plus:+\n      Num:2\n  <absent>"
        );
    }

    #[test]
    fn clone_dumps_the_same() {
        let tree = sample();
        assert_eq!(tree.clone().dump(), tree.dump());
    }

    #[test]
    fn replacing_a_child_leaves_the_original() {
        let tree = sample();
        let node = tree.node().unwrap();
        let replaced = node.with_child(0, terminal(T::Num, "5")).unwrap();
        assert_eq!(replaced.children[0].text(), Some("5"));
        assert_eq!(node.children[0].text(), Some("1"));
        assert_eq!(replaced.value, 3);
        match (&replaced.children[1], &node.children[1]) {
            (SyntaxNode::Many(a), SyntaxNode::Many(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("expected repetitions")
        }
        assert!(node.with_child(3, SyntaxNode::Absent).is_none());
    }

    #[test]
    fn accessors() {
        let tree = sample();
        assert_eq!(tree.value(), Some(&3));
        let children = &tree.node().unwrap().children;
        assert!(children[2].is_absent());
        assert_eq!(children[1].items().len(), 1);
        assert_eq!(children[1].items()[0].label(), Some("tail"));
        assert_eq!(children[0].items().len(), 0);
    }
}
