//! Operator overloads (`|`, `&`, `-`, `^` and their `*Assign` forms) over [`Bitmap64`],
//! delegating to the in-place methods on [`Bitmap64`].

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Sub, SubAssign};

use crate::bitmap::Bitmap64;

impl BitOrAssign<&Bitmap64> for Bitmap64 {
    /// A union between two sets.
    fn bitor_assign(&mut self, rhs: &Bitmap64) {
        self.or(rhs);
    }
}

impl BitOrAssign<Bitmap64> for Bitmap64 {
    /// A union between two sets.
    fn bitor_assign(&mut self, rhs: Bitmap64) {
        self.or(&rhs);
    }
}

impl BitOr<Bitmap64> for Bitmap64 {
    type Output = Bitmap64;
    fn bitor(mut self, rhs: Bitmap64) -> Bitmap64 {
        self |= rhs;
        self
    }
}

impl BitOr<&Bitmap64> for Bitmap64 {
    type Output = Bitmap64;
    fn bitor(mut self, rhs: &Bitmap64) -> Bitmap64 {
        self |= rhs;
        self
    }
}

impl BitOr<Bitmap64> for &Bitmap64 {
    type Output = Bitmap64;
    fn bitor(self, rhs: Bitmap64) -> Bitmap64 {
        BitOr::bitor(rhs, self)
    }
}

impl BitOr<&Bitmap64> for &Bitmap64 {
    type Output = Bitmap64;
    fn bitor(self, rhs: &Bitmap64) -> Bitmap64 {
        BitOr::bitor(self.clone(), rhs)
    }
}

impl BitAndAssign<&Bitmap64> for Bitmap64 {
    /// An intersection between two sets.
    fn bitand_assign(&mut self, rhs: &Bitmap64) {
        self.and(rhs);
    }
}

impl BitAndAssign<Bitmap64> for Bitmap64 {
    /// An intersection between two sets.
    fn bitand_assign(&mut self, rhs: Bitmap64) {
        self.and(&rhs);
    }
}

impl BitAnd<Bitmap64> for Bitmap64 {
    type Output = Bitmap64;
    fn bitand(mut self, rhs: Bitmap64) -> Bitmap64 {
        self &= rhs;
        self
    }
}

impl BitAnd<&Bitmap64> for Bitmap64 {
    type Output = Bitmap64;
    fn bitand(mut self, rhs: &Bitmap64) -> Bitmap64 {
        self &= rhs;
        self
    }
}

impl BitAnd<Bitmap64> for &Bitmap64 {
    type Output = Bitmap64;
    fn bitand(self, rhs: Bitmap64) -> Bitmap64 {
        BitAnd::bitand(rhs, self)
    }
}

impl BitAnd<&Bitmap64> for &Bitmap64 {
    type Output = Bitmap64;
    fn bitand(self, rhs: &Bitmap64) -> Bitmap64 {
        BitAnd::bitand(self.clone(), rhs)
    }
}

impl SubAssign<&Bitmap64> for Bitmap64 {
    /// A difference between two sets.
    fn sub_assign(&mut self, rhs: &Bitmap64) {
        self.and_not(rhs);
    }
}

impl SubAssign<Bitmap64> for Bitmap64 {
    /// A difference between two sets.
    fn sub_assign(&mut self, rhs: Bitmap64) {
        self.and_not(&rhs);
    }
}

impl Sub<Bitmap64> for Bitmap64 {
    type Output = Bitmap64;
    fn sub(mut self, rhs: Bitmap64) -> Bitmap64 {
        self -= rhs;
        self
    }
}

impl Sub<&Bitmap64> for Bitmap64 {
    type Output = Bitmap64;
    fn sub(mut self, rhs: &Bitmap64) -> Bitmap64 {
        self -= rhs;
        self
    }
}

impl Sub<Bitmap64> for &Bitmap64 {
    type Output = Bitmap64;
    fn sub(self, rhs: Bitmap64) -> Bitmap64 {
        Sub::sub(self.clone(), rhs)
    }
}

impl Sub<&Bitmap64> for &Bitmap64 {
    type Output = Bitmap64;
    fn sub(self, rhs: &Bitmap64) -> Bitmap64 {
        Sub::sub(self.clone(), rhs)
    }
}

impl BitXorAssign<&Bitmap64> for Bitmap64 {
    /// A symmetric difference between two sets.
    fn bitxor_assign(&mut self, rhs: &Bitmap64) {
        self.xor(rhs);
    }
}

impl BitXorAssign<Bitmap64> for Bitmap64 {
    /// A symmetric difference between two sets.
    fn bitxor_assign(&mut self, rhs: Bitmap64) {
        self.xor(&rhs);
    }
}

impl BitXor<Bitmap64> for Bitmap64 {
    type Output = Bitmap64;
    fn bitxor(mut self, rhs: Bitmap64) -> Bitmap64 {
        self ^= rhs;
        self
    }
}

impl BitXor<&Bitmap64> for Bitmap64 {
    type Output = Bitmap64;
    fn bitxor(mut self, rhs: &Bitmap64) -> Bitmap64 {
        self ^= rhs;
        self
    }
}

impl BitXor<Bitmap64> for &Bitmap64 {
    type Output = Bitmap64;
    fn bitxor(self, rhs: Bitmap64) -> Bitmap64 {
        BitXor::bitxor(rhs, self)
    }
}

impl BitXor<&Bitmap64> for &Bitmap64 {
    type Output = Bitmap64;
    fn bitxor(self, rhs: &Bitmap64) -> Bitmap64 {
        BitXor::bitxor(self.clone(), rhs)
    }
}
