/// Creates a [`DynamicArray`](crate::DynamicArray) from a literal element list,
/// in the manner of `vec!`.
///
/// - `dyn_array![]` creates an empty array.
/// - `dyn_array![elem; n]` creates `n` clones of `elem`.
/// - `dyn_array![a, b, c]` moves the listed elements in order, with
///   `len == capacity == 3`.
///
/// ```
/// use simple_vector::dyn_array;
///
/// let v = dyn_array![1, 2, 3];
/// assert_eq!(v.capacity(), 3);
/// assert_eq!(dyn_array!["x"; 2], ["x", "x"]);
/// ```
#[macro_export]
macro_rules! dyn_array {
    () => {
        $crate::DynamicArray::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::DynamicArray::from_elem($n, $elem)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::DynamicArray::from([$($x),+])
    };
}
