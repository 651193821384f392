/// Create a [HandleVec](crate::HandleVec) containing the arguments, as with [std::vec!].
///
/// Values occupy slots in argument order, starting at slot 0.
#[macro_export]
macro_rules! handlevec {
    [] => {
        $crate::HandleVec::new()
    };
    [$elem:expr; $n:expr] => {
        std::iter::repeat($elem).take($n).collect::<$crate::HandleVec<_>>()
    };
    [$($x:expr),+ $(,)?] => {
        [$($x),+].into_iter().collect::<$crate::HandleVec<_>>()
    }
}
