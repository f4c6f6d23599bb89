//! Argument-list trie.
//!
//! # Design
//!
//! A list is a node in a prefix trie; the root is [`ArgListId::EMPTY`]. Each
//! node remembers the argument on its incoming edge (the list's head) and its
//! parent (the list's tail). Consing an argument onto a list follows an
//! existing edge whose label is structurally equal, or mints a new node, so
//! equal sequences always end at the same node.
//!
//! Type edges match by [`TypeId`] equality. Value edges match by
//! [`ValueTable::equals`], which is why two distinct value IDs holding the
//! same tuple produce the same list.
//!
//! Consing prepends: build a list by inserting its arguments from last to
//! first, or use [`ArgListTrie::from_args`].

use qy_ir::{ArgListId, MonoError, MonoResult, TypeId, ValueId};
use qy_values::ValueTable;
use smallvec::SmallVec;

/// One element of an argument list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Arg {
    Type(TypeId),
    Value(ValueId),
}

struct TrieNode {
    parent: ArgListId,
    /// Incoming edge label; `None` only for the root.
    head: Option<Arg>,
    len: usize,
    type_edges: SmallVec<[(TypeId, ArgListId); 2]>,
    value_edges: SmallVec<[(ValueId, ArgListId); 2]>,
}

impl TrieNode {
    fn new(parent: ArgListId, head: Option<Arg>, len: usize) -> Self {
        TrieNode {
            parent,
            head,
            len,
            type_edges: SmallVec::new(),
            value_edges: SmallVec::new(),
        }
    }
}

pub struct ArgListTrie {
    nodes: Vec<TrieNode>,
}

impl ArgListTrie {
    pub fn new() -> Self {
        ArgListTrie {
            nodes: vec![TrieNode::new(ArgListId::INVALID, None, 0)],
        }
    }

    fn node(&self, list: ArgListId) -> MonoResult<&TrieNode> {
        self.nodes
            .get(list.index())
            .ok_or_else(|| MonoError::unknown("argument list", list.raw()))
    }

    fn mint(&mut self, parent: ArgListId, head: Arg) -> MonoResult<ArgListId> {
        let len = self.node(parent)?.len + 1;
        let id = ArgListId::from_index(self.nodes.len());
        self.nodes.push(TrieNode::new(parent, Some(head), len));
        Ok(id)
    }

    /// The list `[ty, ..list]`.
    pub fn cons_type(&mut self, list: ArgListId, ty: TypeId) -> MonoResult<ArgListId> {
        let existing = self.node(list)?.type_edges.iter().find(|(t, _)| *t == ty).map(|&(_, next)| next);
        if let Some(next) = existing {
            return Ok(next);
        }
        let next = self.mint(list, Arg::Type(ty))?;
        self.nodes[list.index()].type_edges.push((ty, next));
        Ok(next)
    }

    /// The list `[value, ..list]`, matching existing edges by structural equality.
    pub fn cons_value(&mut self, values: &ValueTable, list: ArgListId, value: ValueId) -> MonoResult<ArgListId> {
        let existing = self
            .node(list)?
            .value_edges
            .iter()
            .find(|&&(v, _)| values.equals(v, value))
            .map(|&(_, next)| next);
        if let Some(next) = existing {
            return Ok(next);
        }
        let next = self.mint(list, Arg::Value(value))?;
        self.nodes[list.index()].value_edges.push((value, next));
        Ok(next)
    }

    pub fn cons(&mut self, values: &ValueTable, list: ArgListId, arg: Arg) -> MonoResult<ArgListId> {
        match arg {
            Arg::Type(ty) => self.cons_type(list, ty),
            Arg::Value(value) => self.cons_value(values, list, value),
        }
    }

    /// Build the list holding `args` in order.
    pub fn from_args(&mut self, values: &ValueTable, args: &[Arg]) -> MonoResult<ArgListId> {
        args.iter()
            .rev()
            .try_fold(ArgListId::EMPTY, |list, &arg| self.cons(values, list, arg))
    }

    /// Build a list of types. Needs no value table since type edges match by ID.
    pub fn from_types(&mut self, types: &[TypeId]) -> MonoResult<ArgListId> {
        types.iter().rev().try_fold(ArgListId::EMPTY, |list, &ty| self.cons_type(list, ty))
    }

    /// First argument of a non-empty list.
    pub fn head(&self, list: ArgListId) -> MonoResult<Arg> {
        self.node(list)?
            .head
            .ok_or_else(|| MonoError::invariant("head of the empty argument list"))
    }

    /// Everything after the head of a non-empty list.
    pub fn tail(&self, list: ArgListId) -> MonoResult<ArgListId> {
        let node = self.node(list)?;
        if node.head.is_none() {
            return Err(MonoError::invariant("tail of the empty argument list"));
        }
        Ok(node.parent)
    }

    pub fn len(&self, list: ArgListId) -> MonoResult<usize> {
        self.node(list).map(|node| node.len)
    }

    /// The arguments of `list`, head first.
    pub fn to_vec(&self, list: ArgListId) -> MonoResult<Vec<Arg>> {
        let mut out = Vec::with_capacity(self.len(list)?);
        let mut cursor = list;
        while cursor != ArgListId::EMPTY {
            out.push(self.head(cursor)?);
            cursor = self.tail(cursor)?;
        }
        Ok(out)
    }

    /// The arguments of a list that holds only types.
    pub fn to_types(&self, list: ArgListId) -> MonoResult<Vec<TypeId>> {
        self.to_vec(list)?
            .into_iter()
            .map(|arg| match arg {
                Arg::Type(ty) => Ok(ty),
                Arg::Value(value) => Err(MonoError::invariant(format!(
                    "expected a type argument, found value {value:?}"
                ))),
            })
            .collect()
    }

    /// Number of trie nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for ArgListTrie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
