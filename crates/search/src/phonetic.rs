//! Double Metaphone phonetic encoder
//!
//! Produces up to two sound codes per token: a primary code and, for
//! ambiguous spellings, an alternate one. Codes are upper-case ASCII and
//! have no length cap. Input is upper-cased first; characters the algorithm
//! has no rule for (digits, punctuation) contribute nothing.
//!
//! Callers only encode tokens of four or more characters; that gate lives
//! in [`encode_text`] and in the matcher builder, not in the encoder.

use crate::tokenizer;

/// Minimum token length (in characters) that receives a phonetic code
pub const MIN_PHONETIC_LEN: usize = 4;

/// Encode a single token
///
/// Returns the primary code followed by the alternate code when it differs.
/// Returns an empty vector when the token yields no code at all.
///
/// # Example
///
/// ```
/// use lodestar_search::phonetic::double_metaphone;
///
/// assert_eq!(double_metaphone("Smith"), vec!["SM0", "XMT"]);
/// assert_eq!(double_metaphone("whale"), vec!["AL"]);
/// ```
pub fn double_metaphone(token: &str) -> Vec<String> {
    let (primary, alternate) = Encoder::new(token).encode();
    let mut codes = Vec::with_capacity(2);
    if !primary.is_empty() {
        codes.push(primary.clone());
    }
    if !alternate.is_empty() && alternate != primary {
        codes.push(alternate);
    }
    codes
}

/// Space-joined codes of one token, as stored and queried
pub fn token_code(token: &str) -> String {
    double_metaphone(token).join(" ")
}

/// Phonetic codes of every long token of `text`
///
/// Tokenizes, keeps tokens of at least [`MIN_PHONETIC_LEN`] characters,
/// encodes each and joins all codes with single spaces. `None` when no
/// token qualifies.
pub fn encode_text(text: &str) -> Option<String> {
    let codes: Vec<String> = tokenizer::keywords(text, MIN_PHONETIC_LEN)
        .into_iter()
        .map(token_code)
        .filter(|code| !code.is_empty())
        .collect();
    let joined = codes.join(" ");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ============================================================================
// Encoder
// ============================================================================

const NUL: char = '\0';

#[derive(Default)]
struct Codes {
    primary: String,
    alternate: String,
}

impl Codes {
    fn both(&mut self, code: &str) {
        self.primary.push_str(code);
        self.alternate.push_str(code);
    }

    fn split(&mut self, primary: &str, alternate: &str) {
        self.primary.push_str(primary);
        self.alternate.push_str(alternate);
    }

    fn primary_only(&mut self, code: &str) {
        self.primary.push_str(code);
    }

    fn alternate_only(&mut self, code: &str) {
        self.alternate.push_str(code);
    }
}

struct Encoder {
    chars: Vec<char>,
    last: isize,
    slavo_germanic: bool,
    out: Codes,
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'A' | 'E' | 'I' | 'O' | 'U' | 'Y')
}

impl Encoder {
    fn new(token: &str) -> Self {
        let upper = token.trim().to_uppercase();
        let slavo_germanic = upper.contains('W')
            || upper.contains('K')
            || upper.contains("CZ")
            || upper.contains("WITZ");
        let chars: Vec<char> = upper.chars().collect();
        Encoder {
            last: chars.len() as isize - 1,
            chars,
            slavo_germanic,
            out: Codes::default(),
        }
    }

    /// Character at `i`, NUL when out of range
    fn at(&self, i: isize) -> char {
        if i < 0 {
            return NUL;
        }
        self.chars.get(i as usize).copied().unwrap_or(NUL)
    }

    /// Whether any option occurs verbatim at `start`
    fn at_any(&self, start: isize, options: &[&str]) -> bool {
        if start < 0 {
            return false;
        }
        let start = start as usize;
        options.iter().any(|opt| {
            let len = opt.chars().count();
            start + len <= self.chars.len()
                && self.chars[start..start + len].iter().copied().eq(opt.chars())
        })
    }

    /// Skip one position, or two when the next character repeats `c`
    fn skip_double(&self, i: isize, c: char) -> isize {
        if self.at(i + 1) == c {
            i + 2
        } else {
            i + 1
        }
    }

    fn is_germanic_prefix(&self) -> bool {
        self.at_any(0, &["VAN ", "VON "]) || self.at_any(0, &["SCH"])
    }

    fn encode(mut self) -> (String, String) {
        let mut i: isize = if self.at_any(0, &["GN", "KN", "PN", "WR", "PS"]) {
            1
        } else {
            0
        };

        while i <= self.last {
            i = match self.at(i) {
                'A' | 'E' | 'I' | 'O' | 'U' | 'Y' => {
                    if i == 0 {
                        self.out.both("A");
                    }
                    i + 1
                }
                'B' => {
                    self.out.both("P");
                    self.skip_double(i, 'B')
                }
                'Ç' => {
                    self.out.both("S");
                    i + 1
                }
                'C' => self.c(i),
                'D' => self.d(i),
                'F' => {
                    self.out.both("F");
                    self.skip_double(i, 'F')
                }
                'G' => self.g(i),
                'H' => self.h(i),
                'J' => self.j(i),
                'K' => {
                    self.out.both("K");
                    self.skip_double(i, 'K')
                }
                'L' => self.l(i),
                'M' => {
                    self.out.both("M");
                    if self.m_is_doubled(i) {
                        i + 2
                    } else {
                        i + 1
                    }
                }
                'N' => {
                    self.out.both("N");
                    self.skip_double(i, 'N')
                }
                'Ñ' => {
                    self.out.both("N");
                    i + 1
                }
                'P' => self.p(i),
                'Q' => {
                    self.out.both("K");
                    self.skip_double(i, 'Q')
                }
                'R' => self.r(i),
                'S' => self.s(i),
                'T' => self.t(i),
                'V' => {
                    self.out.both("F");
                    self.skip_double(i, 'V')
                }
                'W' => self.w(i),
                'X' => self.x(i),
                'Z' => self.z(i),
                _ => i + 1,
            };
        }

        (self.out.primary, self.out.alternate)
    }

    // ------------------------------------------------------------------------
    // C
    // ------------------------------------------------------------------------

    fn c(&mut self, i: isize) -> isize {
        if self.c_is_hard_germanic(i) {
            self.out.both("K");
            i + 2
        } else if i == 0 && self.at_any(i, &["CAESAR"]) {
            self.out.both("S");
            i + 2
        } else if self.at_any(i, &["CH"]) {
            self.ch(i)
        } else if self.at_any(i, &["CZ"]) && !self.at_any(i - 2, &["WICZ"]) {
            self.out.split("S", "X");
            i + 2
        } else if self.at_any(i + 1, &["CIA"]) {
            self.out.both("X");
            i + 3
        } else if self.at_any(i, &["CC"]) && !(i == 1 && self.at(0) == 'M') {
            self.cc(i)
        } else if self.at_any(i, &["CK", "CG", "CQ"]) {
            self.out.both("K");
            i + 2
        } else if self.at_any(i, &["CI", "CE", "CY"]) {
            if self.at_any(i, &["CIO", "CIE", "CIA"]) {
                self.out.split("S", "X");
            } else {
                self.out.both("S");
            }
            i + 2
        } else {
            self.out.both("K");
            if self.at_any(i + 1, &[" C", " Q", " G"]) {
                i + 3
            } else if self.at_any(i + 1, &["C", "K", "Q"]) && !self.at_any(i + 1, &["CE", "CI"]) {
                i + 2
            } else {
                i + 1
            }
        }
    }

    fn c_is_hard_germanic(&self, i: isize) -> bool {
        if self.at_any(i, &["CHIA"]) {
            return true;
        }
        if i <= 1 || is_vowel(self.at(i - 2)) || !self.at_any(i - 1, &["ACH"]) {
            return false;
        }
        let next = self.at(i + 2);
        (next != 'I' && next != 'E') || self.at_any(i - 2, &["BACHER", "MACHER"])
    }

    fn cc(&mut self, i: isize) -> isize {
        if self.at_any(i + 2, &["I", "E", "H"]) && !self.at_any(i + 2, &["HU"]) {
            if (i == 1 && self.at(i - 1) == 'A') || self.at_any(i - 1, &["UCCEE", "UCCES"]) {
                self.out.both("KS");
            } else {
                self.out.both("X");
            }
            i + 3
        } else {
            self.out.both("K");
            i + 2
        }
    }

    fn ch(&mut self, i: isize) -> isize {
        if i > 0 && self.at_any(i, &["CHAE"]) {
            self.out.split("K", "X");
        } else if self.ch_is_greek(i) || self.ch_is_hard(i) {
            self.out.both("K");
        } else if i > 0 {
            if self.at_any(0, &["MC"]) {
                self.out.both("K");
            } else {
                self.out.split("X", "K");
            }
        } else {
            self.out.both("X");
        }
        i + 2
    }

    fn ch_is_greek(&self, i: isize) -> bool {
        i == 0
            && (self.at_any(i + 1, &["HARAC", "HARIS"])
                || self.at_any(i + 1, &["HOR", "HYM", "HIA", "HEM"]))
            && !self.at_any(0, &["CHORE"])
    }

    fn ch_is_hard(&self, i: isize) -> bool {
        self.is_germanic_prefix()
            || self.at_any(i - 2, &["ORCHES", "ARCHIT", "ORCHID"])
            || self.at_any(i + 2, &["T", "S"])
            || ((self.at_any(i - 1, &["A", "O", "U", "E"]) || i == 0)
                && (self.at_any(i + 2, &["L", "R", "N", "M", "B", "H", "F", "V", "W", " "])
                    || i + 1 == self.last))
    }

    // ------------------------------------------------------------------------
    // D, G, H, J
    // ------------------------------------------------------------------------

    fn d(&mut self, i: isize) -> isize {
        if self.at_any(i, &["DG"]) {
            if self.at_any(i + 2, &["I", "E", "Y"]) {
                self.out.both("J");
                i + 3
            } else {
                self.out.both("TK");
                i + 2
            }
        } else if self.at_any(i, &["DT", "DD"]) {
            self.out.both("T");
            i + 2
        } else {
            self.out.both("T");
            i + 1
        }
    }

    fn g(&mut self, i: isize) -> isize {
        let next = self.at(i + 1);
        if next == 'H' {
            return self.gh(i);
        }
        if next == 'N' {
            if i == 1 && is_vowel(self.at(0)) && !self.slavo_germanic {
                self.out.split("KN", "N");
            } else if !self.at_any(i + 2, &["EY"]) && !self.slavo_germanic {
                self.out.split("N", "KN");
            } else {
                self.out.both("KN");
            }
            return i + 2;
        }
        if self.at_any(i + 1, &["LI"]) && !self.slavo_germanic {
            self.out.split("KL", "L");
            return i + 2;
        }
        if i == 0
            && (next == 'Y'
                || self.at_any(
                    i + 1,
                    &["ES", "EP", "EB", "EL", "EY", "IB", "IL", "IN", "IE", "EI", "ER"],
                ))
        {
            self.out.split("K", "J");
            return i + 2;
        }
        if (self.at_any(i + 1, &["ER"]) || next == 'Y')
            && !self.at_any(0, &["DANGER", "RANGER", "MANGER"])
            && !self.at_any(i - 1, &["E", "I"])
            && !self.at_any(i - 1, &["RGY", "OGY"])
        {
            self.out.split("K", "J");
            return i + 2;
        }
        if self.at_any(i + 1, &["E", "I", "Y"]) || self.at_any(i - 1, &["AGGI", "OGGI"]) {
            if self.is_germanic_prefix() || self.at_any(i + 1, &["ET"]) {
                self.out.both("K");
            } else if self.at_any(i + 1, &["IER"]) {
                self.out.both("J");
            } else {
                self.out.split("J", "K");
            }
            return i + 2;
        }
        self.out.both("K");
        self.skip_double(i, 'G')
    }

    fn gh(&mut self, i: isize) -> isize {
        if i > 0 && !is_vowel(self.at(i - 1)) {
            self.out.both("K");
        } else if i == 0 {
            if self.at(i + 2) == 'I' {
                self.out.both("J");
            } else {
                self.out.both("K");
            }
        } else if (i > 1 && self.at_any(i - 2, &["B", "H", "D"]))
            || (i > 2 && self.at_any(i - 3, &["B", "H", "D"]))
            || (i > 3 && self.at_any(i - 4, &["B", "H"]))
        {
            // silent, as in "hugh"
        } else if i > 2 && self.at(i - 1) == 'U' && self.at_any(i - 3, &["C", "G", "L", "R", "T"]) {
            self.out.both("F");
        } else if self.at(i - 1) != 'I' {
            self.out.both("K");
        }
        i + 2
    }

    fn h(&mut self, i: isize) -> isize {
        if (i == 0 || is_vowel(self.at(i - 1))) && is_vowel(self.at(i + 1)) {
            self.out.both("H");
            i + 2
        } else {
            i + 1
        }
    }

    fn j(&mut self, i: isize) -> isize {
        if self.at_any(i, &["JOSE"]) || self.at_any(0, &["SAN "]) {
            if (i == 0 && self.at(i + 4) == ' ')
                || self.chars.len() == 4
                || self.at_any(0, &["SAN "])
            {
                self.out.both("H");
            } else {
                self.out.split("J", "H");
            }
            return i + 1;
        }

        if i == 0 {
            self.out.split("J", "A");
        } else if is_vowel(self.at(i - 1))
            && !self.slavo_germanic
            && matches!(self.at(i + 1), 'A' | 'O')
        {
            self.out.split("J", "H");
        } else if i == self.last {
            self.out.primary_only("J");
        } else if !self.at_any(i + 1, &["L", "T", "K", "S", "N", "M", "B", "Z"])
            && !self.at_any(i - 1, &["S", "K", "L"])
        {
            self.out.both("J");
        }
        self.skip_double(i, 'J')
    }

    // ------------------------------------------------------------------------
    // L, M, P, R
    // ------------------------------------------------------------------------

    fn l(&mut self, i: isize) -> isize {
        if self.at(i + 1) != 'L' {
            self.out.both("L");
            return i + 1;
        }
        if self.ll_is_spanish(i) {
            self.out.primary_only("L");
        } else {
            self.out.both("L");
        }
        i + 2
    }

    fn ll_is_spanish(&self, i: isize) -> bool {
        let len = self.chars.len() as isize;
        if i == len - 3 && self.at_any(i - 1, &["ILLO", "ILLA", "ALLE"]) {
            return true;
        }
        (self.at_any(len - 2, &["AS", "OS"]) || self.at_any(len - 1, &["A", "O"]))
            && self.at_any(i - 1, &["ALLE"])
    }

    fn m_is_doubled(&self, i: isize) -> bool {
        if self.at(i + 1) == 'M' {
            return true;
        }
        self.at_any(i - 1, &["UMB"]) && (i + 1 == self.last || self.at_any(i + 2, &["ER"]))
    }

    fn p(&mut self, i: isize) -> isize {
        if self.at(i + 1) == 'H' {
            self.out.both("F");
            return i + 2;
        }
        self.out.both("P");
        if self.at_any(i + 1, &["P", "B"]) {
            i + 2
        } else {
            i + 1
        }
    }

    fn r(&mut self, i: isize) -> isize {
        if i == self.last
            && !self.slavo_germanic
            && self.at_any(i - 2, &["IE"])
            && !self.at_any(i - 4, &["ME", "MA"])
        {
            self.out.alternate_only("R");
        } else {
            self.out.both("R");
        }
        self.skip_double(i, 'R')
    }

    // ------------------------------------------------------------------------
    // S, T, W, X, Z
    // ------------------------------------------------------------------------

    fn s(&mut self, i: isize) -> isize {
        if self.at_any(i - 1, &["ISL", "YSL"]) {
            return i + 1;
        }
        if i == 0 && self.at_any(i, &["SUGAR"]) {
            self.out.split("X", "S");
            return i + 1;
        }
        if self.at_any(i, &["SH"]) {
            if self.at_any(i + 1, &["HEIM", "HOEK", "HOLM", "HOLZ"]) {
                self.out.both("S");
            } else {
                self.out.both("X");
            }
            return i + 2;
        }
        if self.at_any(i, &["SIO", "SIA"]) || self.at_any(i, &["SIAN"]) {
            if self.slavo_germanic {
                self.out.both("S");
            } else {
                self.out.split("S", "X");
            }
            return i + 3;
        }
        if (i == 0 && self.at_any(i + 1, &["M", "N", "L", "W"])) || self.at_any(i + 1, &["Z"]) {
            self.out.split("S", "X");
            return if self.at_any(i + 1, &["Z"]) { i + 2 } else { i + 1 };
        }
        if self.at_any(i, &["SC"]) {
            return self.sc(i);
        }
        if i == self.last && self.at_any(i - 2, &["AI", "OI"]) {
            self.out.alternate_only("S");
        } else {
            self.out.both("S");
        }
        if self.at_any(i + 1, &["S", "Z"]) {
            i + 2
        } else {
            i + 1
        }
    }

    fn sc(&mut self, i: isize) -> isize {
        if self.at(i + 2) == 'H' {
            if self.at_any(i + 3, &["OO", "ER", "EN", "UY", "ED", "EM"]) {
                if self.at_any(i + 3, &["ER", "EN"]) {
                    self.out.split("X", "SK");
                } else {
                    self.out.both("SK");
                }
            } else if i == 0 && !is_vowel(self.at(3)) && self.at(3) != 'W' {
                self.out.split("X", "S");
            } else {
                self.out.both("X");
            }
        } else if self.at_any(i + 2, &["I", "E", "Y"]) {
            self.out.both("S");
        } else {
            self.out.both("SK");
        }
        i + 3
    }

    fn t(&mut self, i: isize) -> isize {
        if self.at_any(i, &["TION"]) || self.at_any(i, &["TIA", "TCH"]) {
            self.out.both("X");
            return i + 3;
        }
        if self.at_any(i, &["TH"]) || self.at_any(i, &["TTH"]) {
            if self.at_any(i + 2, &["OM", "AM"]) || self.is_germanic_prefix() {
                self.out.both("T");
            } else {
                self.out.split("0", "T");
            }
            return i + 2;
        }
        self.out.both("T");
        if self.at_any(i + 1, &["T", "D"]) {
            i + 2
        } else {
            i + 1
        }
    }

    fn w(&mut self, i: isize) -> isize {
        if self.at_any(i, &["WR"]) {
            self.out.both("R");
            return i + 2;
        }
        let next_is_vowel = is_vowel(self.at(i + 1));
        if i == 0 && (next_is_vowel || self.at_any(i, &["WH"])) {
            if next_is_vowel {
                self.out.split("A", "F");
            } else {
                self.out.both("A");
            }
            return i + 1;
        }
        if (i == self.last && is_vowel(self.at(i - 1)))
            || self.at_any(i - 1, &["EWSKI", "EWSKY", "OWSKI", "OWSKY"])
            || self.at_any(0, &["SCH"])
        {
            self.out.alternate_only("F");
            return i + 1;
        }
        if self.at_any(i, &["WICZ", "WITZ"]) {
            self.out.split("TS", "FX");
            return i + 4;
        }
        i + 1
    }

    fn x(&mut self, i: isize) -> isize {
        if i == 0 {
            self.out.both("S");
            return i + 1;
        }
        let french_ending = i == self.last
            && (self.at_any(i - 3, &["IAU", "EAU"]) || self.at_any(i - 2, &["AU", "OU"]));
        if !french_ending {
            self.out.both("KS");
        }
        if self.at_any(i + 1, &["C", "X"]) {
            i + 2
        } else {
            i + 1
        }
    }

    fn z(&mut self, i: isize) -> isize {
        if self.at(i + 1) == 'H' {
            self.out.both("J");
            return i + 2;
        }
        if self.at_any(i + 1, &["ZO", "ZI", "ZA"])
            || (self.slavo_germanic && i > 0 && self.at(i - 1) != 'T')
        {
            self.out.split("S", "TS");
        } else {
            self.out.both("S");
        }
        self.skip_double(i, 'Z')
    }
}
