//! Six-cell one-time code entry

use crate::validate::CODE_LENGTH;

/// Focus and contents of the code input cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpInput {
    cells: Vec<Option<char>>,
    focus: usize,
}

impl Default for OtpInput {
    fn default() -> Self {
        Self::new(CODE_LENGTH)
    }
}

impl OtpInput {
    pub fn new(len: usize) -> Self {
        Self {
            cells: vec![None; len.max(1)],
            focus: 0,
        }
    }

    /// Index of the focused cell
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn cells(&self) -> &[Option<char>] {
        &self.cells
    }

    /// Text typed or pasted into cell `index`
    ///
    /// Non-digits are dropped. Several digits fill consecutive cells. Focus
    /// moves past the last filled cell, stopping at the final one.
    pub fn input(&mut self, index: usize, value: &str) {
        if index >= self.cells.len() {
            return;
        }
        self.focus = index;

        let digits: Vec<char> = value.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            self.cells[index] = None;
            return;
        }

        let mut last = index;
        for (offset, digit) in digits.into_iter().enumerate() {
            let at = index + offset;
            if at >= self.cells.len() {
                break;
            }
            self.cells[at] = Some(digit);
            last = at;
        }

        self.focus = (last + 1).min(self.cells.len() - 1);
    }

    /// Backspace pressed in cell `index`
    pub fn backspace(&mut self, index: usize) {
        if index >= self.cells.len() {
            return;
        }
        if self.cells[index].is_none() && index > 0 {
            self.focus = index - 1;
        } else {
            self.cells[index] = None;
            self.focus = index;
        }
    }

    /// The digits entered so far, in order
    pub fn code(&self) -> String {
        self.cells.iter().flatten().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Empty every cell and focus the first
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
        self.focus = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_advances_focus() {
        let mut otp = OtpInput::default();
        for (i, d) in ["1", "2", "3"].iter().enumerate() {
            otp.input(i, d);
        }
        assert_eq!(otp.focus(), 3);
        assert_eq!(otp.code(), "123");
        assert!(!otp.is_complete());
    }

    #[test]
    fn test_non_digits_are_stripped() {
        let mut otp = OtpInput::default();
        otp.input(0, "a");
        assert_eq!(otp.cells()[0], None);
        assert_eq!(otp.focus(), 0);

        otp.input(0, "x7");
        assert_eq!(otp.code(), "7");
        assert_eq!(otp.focus(), 1);
    }

    #[test]
    fn test_backspace_on_empty_cell_moves_back() {
        let mut otp = OtpInput::default();
        otp.input(0, "4");
        otp.input(1, "2");
        otp.backspace(2);
        assert_eq!(otp.focus(), 1);
        otp.backspace(1);
        assert_eq!(otp.code(), "4");
        assert_eq!(otp.focus(), 1);
        otp.backspace(0);
        assert_eq!(otp.code(), "");
        assert_eq!(otp.focus(), 0);
    }

    #[test]
    fn test_paste_fills_forward_and_stops_at_last_cell() {
        let mut otp = OtpInput::default();
        otp.input(0, "123-456-789");
        assert_eq!(otp.code(), "123456");
        assert!(otp.is_complete());
        assert_eq!(otp.focus(), 5);

        otp.clear();
        assert_eq!(otp.code(), "");
        assert_eq!(otp.focus(), 0);
    }
}
