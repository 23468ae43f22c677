/// Create consuming `with_<field>` builder methods that replace a single field
/// and return the modified value.
macro_rules! with_builders {
    ($($name:ident: $ty:ty),* $(,)?) => {
        paste! {
            $(
                #[doc = concat!("Return a copy with `", stringify!($name), "` replaced by value.")]
                pub fn [<with_ $name>](mut self, value: $ty) -> Self {
                    self.$name = value;
                    self
                }
            )*
        }
    };
}
