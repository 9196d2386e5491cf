use num::complex::Complex;
use num::Zero;

pub type C<T> = Complex<T>;

pub fn c<T>(re: T, im: T) -> C<T> {
    Complex::new(re, im)
}

pub fn cr<T: Zero>(re: T) -> C<T> {
    c(re, T::zero())
}

pub fn ci<T: Zero>(im: T) -> C<T> {
    c(T::zero(), im)
}
