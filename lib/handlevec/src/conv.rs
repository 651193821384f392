//! Conversion of various types to [HandleVec].

use crate::HandleVec;

impl<T> FromIterator<T> for HandleVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut res = Self::with_capacity(iter.size_hint().0);
        for value in iter {
            res.insert(value);
        }
        res
    }
}

impl<T> From<Vec<T>> for HandleVec<T> {
    fn from(v: Vec<T>) -> Self {
        v.into_iter().collect()
    }
}

impl<T> Extend<T> for HandleVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}
