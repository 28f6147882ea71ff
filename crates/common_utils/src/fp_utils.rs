//! Functional programming utilities.

/// Run `f` only when `predicate` holds.
#[inline]
pub fn when<W: Sized, F>(predicate: bool, f: F) -> Result<(), W>
where
    F: FnOnce() -> Result<(), W>,
{
    if predicate {
        f()
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::when;

    #[test]
    fn runs_only_when_predicate_holds() {
        assert_eq!(when(false, || Err("invalid")), Ok(()));
        assert_eq!(when(true, || Err("invalid")), Err("invalid"));
        assert_eq!(when::<&str, _>(true, || Ok(())), Ok(()));
    }
}
