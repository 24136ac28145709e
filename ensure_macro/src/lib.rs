/// Returns early with an error when a condition does not hold
///
/// Based off the `ensure!` macro in dtolnay's anyhow crate, but returns the given error
/// value directly, so it works with any crate-local error enum
///
/// This macro is equivalent to `if !$cond { return Err($err); }`.
///
/// ```
/// # use ensure_macro::ensure;
/// #[derive(Debug, PartialEq)]
/// enum CheckError {
///     ExtraTooLarge(usize),
/// }
///
/// fn check_extra(extra: &[u8]) -> Result<(), CheckError> {
///     ensure!(extra.len() <= 256, CheckError::ExtraTooLarge(extra.len()));
///     Ok(())
/// }
///
/// assert!(check_extra(&[0; 256]).is_ok());
/// assert_eq!(check_extra(&[0; 257]), Err(CheckError::ExtraTooLarge(257)));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}
