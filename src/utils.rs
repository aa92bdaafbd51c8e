pub static CRLF: [u8; 2] = [b'\r', b'\n'];
pub static HEAD_TERMINATOR: [u8; 4] = [b'\r', b'\n', b'\r', b'\n'];

pub trait ByteUtils {
    fn find_bytes(&self, needle: &[u8]) -> Option<usize>;
}

impl ByteUtils for [u8] {
    fn find_bytes(&self, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() || needle.len() > self.len() {
            return None;
        }

        self.windows(needle.len()).position(|window| window == needle)
    }
}
