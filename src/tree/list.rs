//! Ordered lists that accumulate down the tree.

/// Items a node adds on top of everything its ancestors carry.
#[derive(Clone, Debug)]
pub struct InheritedList<T> {
    own: Vec<T>,
}

impl<T> Default for InheritedList<T> {
    fn default() -> Self {
        InheritedList { own: Vec::new() }
    }
}

impl<T: Clone> InheritedList<T> {
    pub fn push(&mut self, item: T) {
        self.own.push(item);
    }

    pub fn own(&self) -> &[T] {
        &self.own
    }

    /// Concatenate a chain given nearest-first (self, parent, grandparent, ...): ancestor items come first.
    pub fn compose<'a, I>(chain: I) -> Vec<T>
    where
        I: IntoIterator<Item = &'a InheritedList<T>>,
        T: 'a,
    {
        let lists: Vec<&InheritedList<T>> = chain.into_iter().collect();
        lists.iter().rev().flat_map(|l| l.own.iter().cloned()).collect()
    }
}
