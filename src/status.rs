//! The sweep-line status: an ordered sequence with cheap insertion and
//! removal in the middle.
//!
//! This is a two-level structure: a vector of bounded chunks. Lookups by
//! index walk the chunk lengths; inserts only shift elements within a single
//! chunk, splitting it when it is full.

use arrayvec::ArrayVec;
use serde::ser::SerializeSeq;

#[derive(Clone, Debug)]
pub struct StatusLine<T, const B: usize> {
    /// Invariant: no chunk is empty.
    chunks: Vec<ArrayVec<T, B>>,
    len: usize,
}

impl<T: serde::Serialize, const B: usize> serde::Serialize for StatusLine<T, B> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for x in self.iter() {
            seq.serialize_element(x)?;
        }
        seq.end()
    }
}

impl<T, const B: usize> Default for StatusLine<T, B> {
    fn default() -> Self {
        Self {
            chunks: Vec::new(),
            len: 0,
        }
    }
}

impl<T, const B: usize> StatusLine<T, B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Finds the chunk containing `index`, and the offset within that chunk.
    fn locate(&self, mut index: usize) -> Option<(usize, usize)> {
        for (chunk_idx, chunk) in self.chunks.iter().enumerate() {
            if index < chunk.len() {
                return Some((chunk_idx, index));
            }
            index -= chunk.len();
        }
        None
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        let (c, off) = self.locate(index)?;
        self.chunks[c].get(off)
    }

    pub fn first(&self) -> Option<&T> {
        self.chunks.first().and_then(|c| c.first())
    }

    pub fn last(&self) -> Option<&T> {
        self.chunks.last().and_then(|c| c.last())
    }

    /// Inserts `element` so that it ends up at position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, element: T) {
        assert!(index <= self.len, "insert index {index} out of bounds");
        let (c, off) = if index == self.len {
            match self.chunks.last() {
                Some(last) => (self.chunks.len() - 1, last.len()),
                None => {
                    self.chunks.push(ArrayVec::new());
                    (0, 0)
                }
            }
        } else {
            // unwrap: we checked the bounds above
            self.locate(index).unwrap()
        };

        let chunk = &mut self.chunks[c];
        if chunk.is_full() {
            let mut second_half: ArrayVec<T, B> = chunk.drain(B / 2..).collect();
            if off <= B / 2 {
                chunk.insert(off, element);
            } else {
                second_half.insert(off - B / 2, element);
            }
            self.chunks.insert(c + 1, second_half);
        } else {
            chunk.insert(off, element);
        }
        self.len += 1;
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        let Some((c, off)) = self.locate(index) else {
            panic!("remove index {index} out of bounds (len {})", self.len);
        };
        let ret = self.chunks[c].remove(off);
        self.len -= 1;

        if self.chunks[c].is_empty() {
            self.chunks.remove(c);
        } else if c + 1 < self.chunks.len()
            && self.chunks[c].len() + self.chunks[c + 1].len() <= B / 2
        {
            let next = self.chunks.remove(c + 1);
            self.chunks[c].extend(next);
        }
        ret
    }

    /// Returns the index of the first element for which `pred` is false,
    /// assuming that `pred` is true on some prefix and false after it.
    pub fn partition_point<P>(&self, mut pred: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        let mut offset = 0;
        for chunk in &self.chunks {
            // unwrap: chunks are never empty
            if pred(chunk.last().unwrap()) {
                offset += chunk.len();
            } else {
                return offset + chunk.partition_point(&mut pred);
            }
        }
        offset
    }

    /// The index of the first element equal to `x`.
    pub fn position(&self, x: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|y| y == x)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.chunks.iter().flat_map(|c| c.iter())
    }

    pub fn check_invariants(&self) {
        assert!(self.chunks.iter().all(|c| !c.is_empty()));
        assert_eq!(self.len, self.chunks.iter().map(|c| c.len()).sum::<usize>());
    }
}

impl<T, const B: usize> FromIterator<T> for StatusLine<T, B> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut ret = StatusLine::new();
        for x in iter {
            ret.insert(ret.len(), x);
        }
        ret
    }
}

impl<T, const B: usize> std::ops::Index<usize> for StatusLine<T, B> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        // unwrap: this is the documented panicking behavior of Index
        self.get(index).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn insert_get() {
        let mut vec = StatusLine::<i32, 4>::default();
        vec.insert(0, 1);
        vec.insert(0, 2);
        vec.insert(0, 3);
        vec.insert(0, 4);
        assert_eq!(*vec.get(0).unwrap(), 4);
        assert_eq!(*vec.get(3).unwrap(), 1);
        vec.check_invariants();

        vec.insert(0, 1);
        vec.insert(0, 2);
        vec.insert(0, 3);
        vec.insert(0, 4);
        vec.check_invariants();
        assert_eq!(
            vec.iter().copied().collect::<Vec<_>>(),
            vec![4, 3, 2, 1, 4, 3, 2, 1]
        );
        assert_eq!(vec.first(), Some(&4));
        assert_eq!(vec.last(), Some(&1));
        assert_eq!(vec.get(8), None);
    }

    #[test]
    fn insert_remove() {
        let mut vec: StatusLine<i32, 4> = (0..10).collect();
        assert_eq!(vec.remove(0), 0);
        assert_eq!(vec.remove(8), 9);
        assert_eq!(vec.remove(3), 4);
        vec.check_invariants();
        assert_eq!(
            vec.iter().copied().collect::<Vec<_>>(),
            vec![1, 2, 3, 5, 6, 7, 8]
        );
        while !vec.is_empty() {
            vec.remove(vec.len() / 2);
            vec.check_invariants();
        }
        assert_eq!(vec.first(), None);
    }

    #[test]
    fn partition_point() {
        let vec: StatusLine<i32, 4> = (0..20).map(|x| 2 * x).collect();
        assert_eq!(vec.partition_point(|&x| x < 0), 0);
        assert_eq!(vec.partition_point(|&x| x < 7), 4);
        assert_eq!(vec.partition_point(|&x| x < 8), 4);
        assert_eq!(vec.partition_point(|&x| x < 100), 20);
        assert_eq!(vec.position(&8), Some(4));
        assert_eq!(vec.position(&9), None);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(usize, i32),
        Remove(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<usize>(), any::<i32>()).prop_map(|(i, x)| Op::Insert(i, x)),
            any::<usize>().prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn matches_vec(ops in proptest::collection::vec(op(), 0..200)) {
            let mut status = StatusLine::<i32, 4>::new();
            let mut vec = Vec::new();
            for op in ops {
                match op {
                    Op::Insert(i, x) => {
                        let i = i % (vec.len() + 1);
                        status.insert(i, x);
                        vec.insert(i, x);
                    }
                    Op::Remove(i) => {
                        if !vec.is_empty() {
                            let i = i % vec.len();
                            prop_assert_eq!(status.remove(i), vec.remove(i));
                        }
                    }
                }
                status.check_invariants();
            }
            prop_assert_eq!(status.iter().copied().collect::<Vec<_>>(), vec);
        }
    }
}
