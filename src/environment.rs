use crate::types::Value;
use derive_more::{Deref, DerefMut};
use itertools::Itertools;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// What the evaluator needs from a variable store. Hosts implement this to
/// expose their own variables to expressions.
pub trait Bindings {
    fn get(&self, name: &str) -> Option<Value>;
    /// Overwrites an existing binding, creating one if the name is unknown.
    fn set(&self, name: &str, value: Value) -> Value;
    /// Binds in the innermost frame, shadowing any outer binding.
    fn create(&self, name: &str, value: Value) -> Value;
}

#[derive(Debug)]
pub struct UnknownSymbol(pub String);

impl fmt::Display for UnknownSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unbound variable: {}", self.0)
    }
}

#[derive(Deref, DerefMut, Debug, Default)]
pub struct Frame(HashMap<String, Value>);

/// A stack of frames, innermost last, optionally backed by a parent store.
///
/// Frames are shared: cloning a scope copies the stack of frame references,
/// not the frames. This is how a procedure captures its defining scope and
/// still sees bindings added to those frames later on.
#[derive(Clone)]
pub struct Scope {
    frames: Vec<Rc<RefCell<Frame>>>,
    parent: Option<Rc<dyn Bindings>>,
}

impl Scope {
    /// A standalone scope with one empty frame.
    pub fn new() -> Self {
        let mut scope = Self {
            frames: Vec::new(),
            parent: None,
        };
        scope.push();
        scope
    }

    /// A scope with no frame of its own: lookups, assignments and top level
    /// definitions all go to `parent`.
    pub fn with_parent(parent: Rc<dyn Bindings>) -> Self {
        Self {
            frames: Vec::new(),
            parent: Some(parent),
        }
    }

    pub fn push(&mut self) {
        self.frames.push(Rc::default());
    }

    pub fn pop(&mut self) {
        // A standalone scope always keeps its base frame.
        if self.parent.is_some() || self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Empties every frame this scope holds, in place. Procedures defined in
    /// a frame they also captured keep that frame alive; clearing breaks the
    /// cycle so a host can release a scope it is finished with. Clones share
    /// the frames and see them emptied. The parent is left alone.
    pub fn clear(&self) {
        for frame in &self.frames {
            frame.borrow_mut().clear();
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    fn frame_binding(&self, name: &str) -> Option<&Rc<RefCell<Frame>>> {
        self.frames
            .iter()
            .rev()
            .find(|frame| frame.borrow().contains_key(name))
    }

    pub fn fetch(&self, name: &str) -> Result<Value, UnknownSymbol> {
        self.get(name).ok_or_else(|| UnknownSymbol(name.into()))
    }

    /// Overwrites an existing binding wherever it lives in the chain. Unlike
    /// [`Bindings::set`], an unknown name is an error.
    pub fn assign(&self, name: &str, value: Value) -> Result<Value, UnknownSymbol> {
        if let Some(frame) = self.frame_binding(name) {
            frame.borrow_mut().insert(name.into(), value.clone());
            return Ok(value);
        }
        match &self.parent {
            Some(parent) if parent.get(name).is_some() => Ok(parent.set(name, value)),
            _ => Err(UnknownSymbol(name.into())),
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Bindings for Scope {
    fn get(&self, name: &str) -> Option<Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.borrow().get(name).cloned())
            .or_else(|| self.parent.as_ref().and_then(|parent| parent.get(name)))
    }

    fn set(&self, name: &str, value: Value) -> Value {
        match self.assign(name, value.clone()) {
            Ok(value) => value,
            Err(_) => self.create(name, value),
        }
    }

    fn create(&self, name: &str, value: Value) -> Value {
        match (self.frames.last(), &self.parent) {
            (Some(frame), _) => {
                frame.borrow_mut().insert(name.into(), value.clone());
                value
            }
            (None, Some(parent)) => parent.create(name, value),
            // Unreachable: a scope without a parent never drops its base frame.
            (None, None) => value,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frames = self
            .frames
            .iter()
            .map(|frame| format!("{{{}}}", frame.borrow().keys().sorted().join(" ")));
        write!(f, "{}", frames.format(" <- "))?;
        if self.parent.is_some() {
            write!(f, " <- parent")?;
        }
        Ok(())
    }
}
