#[macro_export]
macro_rules! bug {
    ($f:tt $(,$x:expr)*) => {
        error!(concat!("BUG: ", $f) $(,$x)*)
    };
}
