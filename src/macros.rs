/// Builds a [`Policy`](crate::Policy) from a literal tree.
///
/// Evaluates to `Result<Policy>`: array literals must be homogeneous, and a
/// mixed or empty array fails with
/// [`Error::TypeMismatch`](crate::Error::TypeMismatch). Keys may be
/// hierarchical. Any other value goes through `Value::from`; wrap negative
/// numbers and paths in parentheses.
///
/// # Examples
///
/// ```rust
/// use policy_writer::{policy, PolicyFile, Value};
///
/// let p = policy!({
///     "name": "lsstcam",
///     "offset": (-3),
///     "gains": [1.5, 1.75],
///     "defaults": (PolicyFile::new("base.paf")),
///     "amp": { "id": 0 }
/// })
/// .unwrap();
///
/// assert_eq!(p.get("offset"), Some(&Value::from(-3)));
/// assert_eq!(p.get("amp.id"), Some(&Value::from(0)));
/// assert!(policy!({ "mixed": [1, "two"] }).is_err());
/// ```
#[macro_export]
macro_rules! policy {
    ({ $($key:literal : $value:tt),* $(,)? }) => {
        (|| -> $crate::Result<$crate::Policy> {
            #[allow(unused_mut)]
            let mut policy = $crate::Policy::new();
            $(
                policy.set($key, $crate::__policy_value!($value)?)?;
            )*
            Ok(policy)
        })()
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __policy_value {
    ({ $($inner:tt)* }) => {
        $crate::policy!({ $($inner)* }).map($crate::Value::Policy)
    };

    ([ $($elem:tt),* $(,)? ]) => {
        (|| -> $crate::Result<$crate::Value> {
            let values: Vec<$crate::Value> = vec![$($crate::__policy_value!($elem)?),*];
            $crate::Array::from_values("", values).map($crate::Value::Array)
        })()
    };

    ($value:expr) => {
        Ok::<$crate::Value, $crate::Error>($crate::Value::from($value))
    };
}
