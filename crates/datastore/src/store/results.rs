/// Result of a one-shot query.
///
/// A finite, forward-only sequence: it can be iterated once and is not
/// `Clone`. Collect it if the records are needed more than once.
#[derive(Debug)]
pub struct QueryResults<M> {
    items: std::vec::IntoIter<M>,
}

impl<M> QueryResults<M> {
    pub(crate) fn new(items: Vec<M>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }
}

impl<M> Iterator for QueryResults<M> {
    type Item = M;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl<M> ExactSizeIterator for QueryResults<M> {}
