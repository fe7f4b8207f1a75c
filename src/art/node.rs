//! Node shapes and the recursive insert/remove/search/traverse algorithms.
//!
//! Keys are always the full 6-byte [`HighKey`]; leaves store the complete key
//! alongside the container rather than relying on the path alone to reconstruct
//! it, which keeps prefix compression simple: a node's `prefix` only needs to be
//! *space-efficient*, never load-bearing for correctness, since a leaf can always
//! be verified (or reported) against its own stored key.

use crate::container::Container;
use crate::key::HighKey;

pub const HIGH_BYTES: usize = crate::key::HIGH_BYTES;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Forward,
    Reverse,
}

pub enum Child {
    Leaf(HighKey, Box<Container>),
    Inner(Box<ArtNode>),
}

pub struct ArtNode {
    pub prefix: Vec<u8>,
    pub body: NodeBody,
}

pub enum NodeBody {
    Node4(Vec<(u8, Child)>),
    Node16(Vec<(u8, Child)>),
    Node48 { index: Box<[u8; 256]>, children: Vec<Option<Child>> },
    Node256(Box<[Option<Child>; 256]>),
}

impl NodeBody {
    fn new4() -> Self {
        NodeBody::Node4(Vec::with_capacity(4))
    }
}

pub fn node_count(body: &NodeBody) -> usize {
    match body {
        NodeBody::Node4(v) | NodeBody::Node16(v) => v.len(),
        NodeBody::Node48 { children, .. } => children.iter().filter(|c| c.is_some()).count(),
        NodeBody::Node256(children) => children.iter().filter(|c| c.is_some()).count(),
    }
}

pub fn node_get<'a>(body: &'a NodeBody, byte: u8) -> Option<&'a Child> {
    match body {
        NodeBody::Node4(v) | NodeBody::Node16(v) => {
            v.iter().find(|(b, _)| *b == byte).map(|(_, c)| c)
        }
        NodeBody::Node48 { index, children } => {
            let slot = index[byte as usize];
            if slot == 0 {
                None
            } else {
                children[slot as usize - 1].as_ref()
            }
        }
        NodeBody::Node256(children) => children[byte as usize].as_ref(),
    }
}

pub fn node_get_mut<'a>(body: &'a mut NodeBody, byte: u8) -> Option<&'a mut Child> {
    match body {
        NodeBody::Node4(v) | NodeBody::Node16(v) => {
            v.iter_mut().find(|(b, _)| *b == byte).map(|(_, c)| c)
        }
        NodeBody::Node48 { index, children } => {
            let slot = index[byte as usize];
            if slot == 0 {
                None
            } else {
                children[slot as usize - 1].as_mut()
            }
        }
        NodeBody::Node256(children) => children[byte as usize].as_mut(),
    }
}

/// Remove and return the child mapped to `byte`, without shrinking the node shape.
fn node_take(body: &mut NodeBody, byte: u8) -> Option<Child> {
    match body {
        NodeBody::Node4(v) | NodeBody::Node16(v) => {
            let pos = v.iter().position(|(b, _)| *b == byte)?;
            Some(v.remove(pos).1)
        }
        NodeBody::Node48 { index, children } => {
            let slot = index[byte as usize];
            if slot == 0 {
                None
            } else {
                index[byte as usize] = 0;
                children[slot as usize - 1].take()
            }
        }
        NodeBody::Node256(children) => children[byte as usize].take(),
    }
}

/// Remove the sole remaining entry from a single-child node, for collapse-on-remove.
fn node_take_only(body: &mut NodeBody) -> (u8, Child) {
    match body {
        NodeBody::Node4(v) | NodeBody::Node16(v) => v.pop().expect("single child"),
        NodeBody::Node48 { index, children } => {
            let byte = index.iter().position(|&s| s != 0).expect("single child") as u8;
            let slot = index[byte as usize];
            index[byte as usize] = 0;
            (byte, children[slot as usize - 1].take().expect("slot occupied"))
        }
        NodeBody::Node256(children) => {
            let byte = children.iter().position(|c| c.is_some()).expect("single child") as u8;
            (byte, children[byte as usize].take().expect("slot occupied"))
        }
    }
}

/// Insert a child at a byte known not to currently be present, growing the node
/// shape first if the Nth child about to be added crosses a threshold.
fn node_insert(body: NodeBody, byte: u8, child: Child) -> NodeBody {
    let body = grow_if_needed(body);
    match body {
        NodeBody::Node4(mut v) => {
            let pos = v.partition_point(|(b, _)| *b < byte);
            v.insert(pos, (byte, child));
            NodeBody::Node4(v)
        }
        NodeBody::Node16(mut v) => {
            let pos = v.partition_point(|(b, _)| *b < byte);
            v.insert(pos, (byte, child));
            NodeBody::Node16(v)
        }
        NodeBody::Node48 { mut index, mut children } => {
            let slot = match children.iter().position(|c| c.is_none()) {
                Some(i) => i,
                None => {
                    children.push(None);
                    children.len() - 1
                }
            };
            children[slot] = Some(child);
            index[byte as usize] = slot as u8 + 1;
            NodeBody::Node48 { index, children }
        }
        NodeBody::Node256(mut children) => {
            children[byte as usize] = Some(child);
            NodeBody::Node256(children)
        }
    }
}

fn grow_if_needed(body: NodeBody) -> NodeBody {
    match body {
        NodeBody::Node4(v) if v.len() >= 4 => {
            NodeBody::Node16(v)
        }
        NodeBody::Node16(v) if v.len() >= 16 => {
            let mut index = Box::new([0u8; 256]);
            let mut children = Vec::with_capacity(48);
            for (byte, child) in v {
                children.push(Some(child));
                index[byte as usize] = children.len() as u8;
            }
            NodeBody::Node48 { index, children }
        }
        NodeBody::Node48 { index, mut children }
            if index.iter().filter(|&&s| s != 0).count() >= 48 =>
        {
            let mut arr: Box<[Option<Child>; 256]> = Box::new(std::array::from_fn(|_| None));
            for byte in 0..256usize {
                let slot = index[byte];
                if slot != 0 {
                    arr[byte] = children[slot as usize - 1].take();
                }
            }
            NodeBody::Node256(arr)
        }
        other => other,
    }
}

fn shrink_if_needed(body: NodeBody) -> NodeBody {
    match body {
        NodeBody::Node256(mut children) => {
            let count = children.iter().filter(|c| c.is_some()).count();
            if count <= 37 {
                let mut index = Box::new([0u8; 256]);
                let mut out = Vec::with_capacity(48);
                for byte in 0..256usize {
                    if let Some(c) = children[byte].take() {
                        out.push(Some(c));
                        index[byte] = out.len() as u8;
                    }
                }
                NodeBody::Node48 { index, children: out }
            } else {
                NodeBody::Node256(children)
            }
        }
        NodeBody::Node48 { index, children } => {
            let count = children.iter().filter(|c| c.is_some()).count();
            if count <= 12 {
                let mut v = Vec::with_capacity(count);
                let mut children = children;
                for byte in 0..256usize {
                    let slot = index[byte];
                    if slot != 0 {
                        if let Some(c) = children[slot as usize - 1].take() {
                            v.push((byte as u8, c));
                        }
                    }
                }
                NodeBody::Node16(v)
            } else {
                NodeBody::Node48 { index, children }
            }
        }
        NodeBody::Node16(v) => {
            if v.len() <= 3 {
                NodeBody::Node4(v)
            } else {
                NodeBody::Node16(v)
            }
        }
        other => other,
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

pub fn search<'a>(node: Option<&'a Child>, key: &HighKey, depth: usize) -> Option<&'a Container> {
    match node? {
        Child::Leaf(lk, lc) => if lk == key { Some(lc) } else { None },
        Child::Inner(inner) => {
            let plen = inner.prefix.len();
            if key[depth..depth + plen] != inner.prefix[..] {
                return None;
            }
            let new_depth = depth + plen;
            let byte = key[new_depth];
            search(node_get(&inner.body, byte), key, new_depth + 1)
        }
    }
}

pub fn search_mut<'a>(
    node: Option<&'a mut Child>,
    key: &HighKey,
    depth: usize,
) -> Option<&'a mut Container> {
    match node? {
        Child::Leaf(lk, lc) => if lk == key { Some(lc) } else { None },
        Child::Inner(inner) => {
            let plen = inner.prefix.len();
            if key[depth..depth + plen] != inner.prefix[..] {
                return None;
            }
            let new_depth = depth + plen;
            let byte = key[new_depth];
            search_mut(node_get_mut(&mut inner.body, byte), key, new_depth + 1)
        }
    }
}

/// Insert `container` at `key`, returning `(new_child, previous_container)`.
pub fn insert(
    node: Option<Child>,
    key: &HighKey,
    depth: usize,
    container: Container,
) -> (Child, Option<Container>) {
    match node {
        None => (Child::Leaf(*key, Box::new(container)), None),
        Some(Child::Leaf(leaf_key, leaf_container)) => {
            if leaf_key == *key {
                return (Child::Leaf(*key, Box::new(container)), Some(*leaf_container));
            }
            let common = common_prefix_len(&leaf_key[depth..], &key[depth..]);
            let branch_depth = depth + common;
            debug_assert!(branch_depth < HIGH_BYTES);
            let new_prefix = leaf_key[depth..branch_depth].to_vec();
            let byte_a = leaf_key[branch_depth];
            let byte_b = key[branch_depth];
            let mut body = NodeBody::new4();
            body = node_insert(body, byte_a, Child::Leaf(leaf_key, leaf_container));
            body = node_insert(body, byte_b, Child::Leaf(*key, Box::new(container)));
            (Child::Inner(Box::new(ArtNode { prefix: new_prefix, body })), None)
        }
        Some(Child::Inner(mut inner)) => {
            let plen = inner.prefix.len();
            let common = common_prefix_len(&inner.prefix, &key[depth..depth + plen]);
            if common < plen {
                let byte_existing = inner.prefix[common];
                inner.prefix = inner.prefix[common + 1..].to_vec();
                let new_prefix = key[depth..depth + common].to_vec();
                let byte_new = key[depth + common];
                let mut body = NodeBody::new4();
                body = node_insert(body, byte_existing, Child::Inner(inner));
                body = node_insert(body, byte_new, Child::Leaf(*key, Box::new(container)));
                return (Child::Inner(Box::new(ArtNode { prefix: new_prefix, body })), None);
            }
            let new_depth = depth + plen;
            let byte = key[new_depth];
            let existing = node_take(&mut inner.body, byte);
            let (new_child, previous) = insert(existing, key, new_depth + 1, container);
            inner.body = node_insert(inner.body, byte, new_child);
            (Child::Inner(inner), previous)
        }
    }
}

/// Remove `key`, returning `(replacement_child, removed_container)`.
pub fn remove(node: Option<Child>, key: &HighKey, depth: usize) -> (Option<Child>, Option<Container>) {
    match node {
        None => (None, None),
        Some(Child::Leaf(lk, lc)) => {
            if lk == *key {
                (None, Some(*lc))
            } else {
                (Some(Child::Leaf(lk, lc)), None)
            }
        }
        Some(Child::Inner(mut inner)) => {
            let plen = inner.prefix.len();
            if key[depth..depth + plen] != inner.prefix[..] {
                return (Some(Child::Inner(inner)), None);
            }
            let new_depth = depth + plen;
            let byte = key[new_depth];
            let existing = match node_take(&mut inner.body, byte) {
                Some(c) => c,
                None => return (Some(Child::Inner(inner)), None),
            };
            let (new_child, removed) = remove(Some(existing), key, new_depth + 1);
            if let Some(c) = new_child {
                inner.body = node_insert(inner.body, byte, c);
            }
            if removed.is_none() {
                return (Some(Child::Inner(inner)), None);
            }
            let count = node_count(&inner.body);
            if count == 0 {
                return (None, removed);
            }
            if count == 1 {
                let (only_byte, only_child) = node_take_only(&mut inner.body);
                let merged = match only_child {
                    Child::Leaf(lk, lc) => Child::Leaf(lk, lc),
                    Child::Inner(mut child_node) => {
                        let mut new_prefix = inner.prefix.clone();
                        new_prefix.push(only_byte);
                        new_prefix.extend_from_slice(&child_node.prefix);
                        child_node.prefix = new_prefix;
                        Child::Inner(child_node)
                    }
                };
                return (Some(merged), removed);
            }
            inner.body = shrink_if_needed(inner.body);
            (Some(Child::Inner(inner)), removed)
        }
    }
}

/// Entries of a node sorted ascending by branch byte, for traversal.
fn node_entries_sorted(body: &NodeBody) -> Vec<(u8, &Child)> {
    match body {
        NodeBody::Node4(v) | NodeBody::Node16(v) => v.iter().map(|(b, c)| (*b, c)).collect(),
        NodeBody::Node48 { index, children } => {
            let mut out = Vec::with_capacity(children.len());
            for byte in 0..256usize {
                let slot = index[byte];
                if slot != 0 {
                    if let Some(c) = &children[slot as usize - 1] {
                        out.push((byte as u8, c));
                    }
                }
            }
            out
        }
        NodeBody::Node256(children) => {
            let mut out = Vec::new();
            for byte in 0..256usize {
                if let Some(c) = &children[byte] {
                    out.push((byte as u8, c));
                }
            }
            out
        }
    }
}

pub struct Frame<'a> {
    entries: Vec<(u8, &'a Child)>,
    pos: isize,
}

pub fn push_frame<'a>(
    child: &'a Child,
    _depth: usize,
    direction: Direction,
    stack: &mut Vec<Frame<'a>>,
) {
    let entries = vec![(0u8, child)];
    let pos = match direction {
        Direction::Forward => 0,
        Direction::Reverse => entries.len() as isize - 1,
    };
    stack.push(Frame { entries, pos });
}

pub fn advance<'a>(
    stack: &mut Vec<Frame<'a>>,
    direction: Direction,
) -> Option<(HighKey, &'a Container)> {
    loop {
        let top = stack.last_mut()?;
        if top.pos < 0 || top.pos as usize >= top.entries.len() {
            stack.pop();
            continue;
        }
        let (_, child) = top.entries[top.pos as usize];
        match direction {
            Direction::Forward => top.pos += 1,
            Direction::Reverse => top.pos -= 1,
        }
        match child {
            Child::Leaf(k, c) => return Some((*k, c.as_ref())),
            Child::Inner(inner) => {
                let entries = node_entries_sorted(&inner.body);
                let pos = match direction {
                    Direction::Forward => 0,
                    Direction::Reverse => entries.len() as isize - 1,
                };
                stack.push(Frame { entries, pos });
            }
        }
    }
}
