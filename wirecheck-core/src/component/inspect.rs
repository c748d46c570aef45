use super::Component;

/// Calls the wrapped component, handing each input and result to observers.
///
/// Constructed by [`Component::inspect()`].
pub(crate) struct Inspected<C, OnInput, OnResult> {
    pub(crate) inner: C,
    pub(crate) on_input: OnInput,
    pub(crate) on_result: OnResult,
}

impl<C, OnInput, OnResult> Component for Inspected<C, OnInput, OnResult>
where
    C: Component,
    OnInput: Fn(&C::Input),
    OnResult: Fn(&Result<C::Output, C::Error>),
{
    type Input = C::Input;
    type Output = C::Output;
    type Error = C::Error;

    fn call(&self, input: C::Input) -> Result<C::Output, C::Error> {
        (self.on_input)(&input);
        let result = self.inner.call(input);
        (self.on_result)(&result);
        result
    }
}
