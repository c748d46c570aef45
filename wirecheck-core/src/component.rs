mod inspect;

/// The core trait for defining calculators in wirecheck.
///
/// A `Component` takes an input and produces an output. Every calculator in
/// the compliance crate is exposed as a component so that callers can treat
/// them uniformly, for example to log each evaluation of a circuit.
///
/// ## Implementing `Component`
///
/// Implement the [`call()`] method, which takes an input and returns either an
/// output or an error. Components must be deterministic: calling twice with
/// the same input yields the same result.
///
/// ## Adapting Components
///
/// Components can be observed with [`Component::inspect()`], which sees each
/// input and result without changing behavior.
///
/// [`call()`]: Component::call
pub trait Component {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Calls the component with the given input and returns a result.
    ///
    /// This is the only method required when implementing `Component`.
    ///
    /// # Errors
    ///
    /// Each component defines its own `Error` type, allowing it to determine
    /// what constitutes a failure within its domain.
    fn call(&self, input: Self::Input) -> Result<Self::Output, Self::Error>;

    /// Observes this component's inputs and results.
    ///
    /// # Parameters
    ///
    /// - `input_handler`: Called with a reference to each input before the call.
    /// - `result_handler`: Called with a reference to each result after the call.
    ///
    /// # Example
    ///
    /// ```
    /// use std::{cell::Cell, convert::Infallible};
    /// use wirecheck_core::Component;
    ///
    /// struct Double;
    /// impl Component for Double {
    ///     type Input = i32;
    ///     type Output = i32;
    ///     type Error = Infallible;
    ///
    ///     fn call(&self, input: i32) -> Result<i32, Self::Error> {
    ///         Ok(input * 2)
    ///     }
    /// }
    ///
    /// let seen = Cell::new(0);
    /// let inspected = Double.inspect(|_| {}, |result| {
    ///     if let Ok(value) = result {
    ///         seen.set(*value);
    ///     }
    /// });
    ///
    /// assert_eq!(inspected.call(4).unwrap(), 8);
    /// assert_eq!(seen.get(), 8);
    /// ```
    fn inspect<InputHandler, ResultHandler>(
        self,
        input_handler: InputHandler,
        result_handler: ResultHandler,
    ) -> impl Component<Input = Self::Input, Output = Self::Output, Error = Self::Error>
    where
        Self: Sized,
        InputHandler: Fn(&Self::Input),
        ResultHandler: Fn(&Result<Self::Output, Self::Error>),
    {
        inspect::Inspected {
            inner: self,
            on_input: input_handler,
            on_result: result_handler,
        }
    }
}
