use std::fmt;

/// Polynomial with coefficients in ascending order: `c0 + c1*x + c2*x^2 + ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Create a polynomial from ascending coefficients
    ///
    /// An empty coefficient list is the zero polynomial.
    pub fn new(coefficients: Vec<f64>) -> Self {
        let coefficients = if coefficients.is_empty() {
            vec![0.0]
        } else {
            coefficients
        };
        Self { coefficients }
    }

    /// The constant polynomial `value`
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Nominal degree (length of the coefficient list minus one)
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Evaluate with Horner's scheme
    ///
    /// # Example
    /// ```
    /// use synthgen::spline::Polynomial;
    ///
    /// // 1 + 2x + 3x^2
    /// let p = Polynomial::new(vec![1.0, 2.0, 3.0]);
    /// assert_eq!(p.eval(2.0), 17.0);
    /// ```
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }

    /// First derivative
    pub fn derivative(&self) -> Self {
        if self.coefficients.len() == 1 {
            return Self::constant(0.0);
        }
        Self::new(
            self.coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(power, &c)| c * power as f64)
                .collect(),
        )
    }

    /// Value of the `order`-th derivative at `x`
    pub fn eval_derivative(&self, order: usize, x: f64) -> f64 {
        (0..order)
            .fold(self.clone(), |p, _| p.derivative())
            .eval(x)
    }

    /// Antiderivative with the given integration constant
    pub fn integral(&self, constant: f64) -> Self {
        let mut coefficients = Vec::with_capacity(self.coefficients.len() + 1);
        coefficients.push(constant);
        coefficients.extend(
            self.coefficients
                .iter()
                .enumerate()
                .map(|(power, &c)| c / (power + 1) as f64),
        );
        Self::new(coefficients)
    }

    /// Same polynomial with its constant term replaced
    pub fn with_constant(&self, constant: f64) -> Self {
        let mut coefficients = self.coefficients.clone();
        coefficients[0] = constant;
        Self::new(coefficients)
    }
}

/// Factor that the coefficient of `x^power` picks up in the `order`-th
/// derivative evaluated at `x`: `power! / (power - order)! * x^(power - order)`
pub fn derivative_weight(power: usize, order: usize, x: f64) -> f64 {
    if power < order {
        return 0.0;
    }
    let falling: f64 = ((power - order + 1)..=power).map(|k| k as f64).product();
    falling * x.powi((power - order) as i32)
}

impl fmt::Display for Polynomial {
    /// Formats as a nested multiply-add chain, highest power innermost
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut expr = String::new();
        for (i, c) in self.coefficients.iter().rev().enumerate() {
            if i == 0 {
                expr = format!("{:?}", c);
            } else {
                expr = format!("({}) * x + {:?}", expr, c);
            }
        }
        write!(f, "{}", expr)
    }
}
