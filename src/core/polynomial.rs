use std::fmt;

use num::complex::Complex64;

use crate::core::error::{NewtonFractalError, Result};

/**
 * Dense complex polynomial. Coefficients are stored with the highest power
 * first, so `[a, b, c]` represents `a z^2 + b z + c`.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<Complex64>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<Complex64>) -> Result<Polynomial> {
        if coefficients.is_empty() {
            return Err(NewtonFractalError::EmptyCoefficients);
        }
        Ok(Polynomial { coefficients })
    }

    /**
     * Builds the monic polynomial whose zeros are exactly `roots`, including
     * multiplicity, by convolving the linear factors `(z - r)` one at a time.
     */
    pub fn from_roots(roots: &[Complex64]) -> Result<Polynomial> {
        if roots.is_empty() {
            return Err(NewtonFractalError::EmptyRootSet);
        }
        let mut coefficients = Vec::with_capacity(roots.len() + 1);
        coefficients.push(Complex64::new(1.0, 0.0));
        for root in roots {
            // (c_0 z^n + ... + c_n) * (z - r)
            coefficients.push(Complex64::new(0.0, 0.0));
            for i in (1..coefficients.len()).rev() {
                let shifted = coefficients[i - 1] * root;
                coefficients[i] -= shifted;
            }
        }
        Ok(Polynomial { coefficients })
    }

    pub fn coefficients(&self) -> &[Complex64] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Power rule. The derivative of a constant is the zero constant.
    pub fn derivative(&self) -> Polynomial {
        let degree = self.degree();
        if degree == 0 {
            return Polynomial {
                coefficients: vec![Complex64::new(0.0, 0.0)],
            };
        }
        let coefficients = self.coefficients[..degree]
            .iter()
            .enumerate()
            .map(|(i, c)| c.scale((degree - i) as f64))
            .collect();
        Polynomial { coefficients }
    }

    /// Horner's scheme.
    #[inline]
    pub fn evaluate(&self, z: Complex64) -> Complex64 {
        self.coefficients
            .iter()
            .fold(Complex64::new(0.0, 0.0), |acc, c| acc * z + c)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let degree = self.degree();
        for (i, c) in self.coefficients.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "({} + {}i)", c.re, c.im)?;
            match degree - i {
                0 => {}
                1 => write!(f, "z")?,
                power => write!(f, "z**{}", power)?,
            }
        }
        Ok(())
    }
}

/**
 * The polynomial having a given set of roots, together with its derivative.
 * Both are derived once at construction and never change, so a model can be
 * shared freely between worker threads.
 */
#[derive(Debug, Clone)]
pub struct PolynomialModel {
    roots: Vec<Complex64>,
    polynomial: Polynomial,
    derivative: Polynomial,
}

impl PolynomialModel {
    pub fn new(roots: Vec<Complex64>) -> Result<PolynomialModel> {
        let polynomial = Polynomial::from_roots(&roots)?;
        let derivative = polynomial.derivative();

        for (i, a) in roots.iter().enumerate() {
            if roots[..i].contains(a) {
                log::warn!(
                    "Duplicate root {} at index {}; samples converging to it classify as the first occurrence",
                    a,
                    i
                );
            }
        }
        log::debug!("Polynomial from {} roots: {}", roots.len(), polynomial);

        Ok(PolynomialModel {
            roots,
            polynomial,
            derivative,
        })
    }

    pub fn roots(&self) -> &[Complex64] {
        &self.roots
    }

    pub fn polynomial(&self) -> &Polynomial {
        &self.polynomial
    }

    pub fn derivative(&self) -> &Polynomial {
        &self.derivative
    }

    #[inline]
    pub fn evaluate(&self, z: Complex64) -> Complex64 {
        self.polynomial.evaluate(z)
    }

    #[inline]
    pub fn evaluate_derivative(&self, z: Complex64) -> Complex64 {
        self.derivative.evaluate(z)
    }
}
