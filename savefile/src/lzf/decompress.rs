use super::{LzfError, Result, MAX_LIT};

/// Decompress `input` into `output`, returning the number of bytes written.
///
/// Every read of `input` and every write to `output` is checked first:
/// running out of input is `Truncated`, running out of room is
/// `OutputTooSmall`, and a reference behind the start of `output` is
/// `BadBackReference`. Nothing past `output` is touched on failure.
pub fn decompress(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let mut ip = 0;
    let mut op = 0;

    while ip < input.len() {
        let ctrl = usize::from(input[ip]);
        ip += 1;

        if ctrl < MAX_LIT {
            let run = ctrl + 1;
            if op + run > output.len() {
                return Err(LzfError::OutputTooSmall);
            }
            let src = input.get(ip..ip + run).ok_or(LzfError::Truncated)?;
            output[op..op + run].copy_from_slice(src);
            op += run;
            ip += run;
            continue;
        }

        let mut len = ctrl >> 5;
        let mut back = (ctrl & 0x1f) << 8;
        if len == 7 {
            len += usize::from(*input.get(ip).ok_or(LzfError::Truncated)?);
            ip += 1;
        }
        back += usize::from(*input.get(ip).ok_or(LzfError::Truncated)?);
        ip += 1;

        let len = len + 2;
        if op + len > output.len() {
            return Err(LzfError::OutputTooSmall);
        }
        if back + 1 > op {
            return Err(LzfError::BadBackReference);
        }

        let from = op - back - 1;
        if from + len <= op {
            output.copy_within(from..from + len, op);
        } else {
            // overlapping: later bytes depend on ones written in this copy
            for i in 0..len {
                output[op + i] = output[from + i];
            }
        }
        op += len;
    }

    Ok(op)
}
