use super::{LzfError, Result, HLOG, HSIZE, MAX_LIT, MAX_OFF, MAX_REF};

const EMPTY: usize = usize::MAX;

// Rolling 3-byte hash. `first` loads two bytes, `next` shifts in the third.
#[inline]
fn first(data: &[u8], p: usize) -> u32 {
    (u32::from(data[p]) << 8) | u32::from(data[p + 1])
}

#[inline]
fn next(v: u32, data: &[u8], p: usize) -> u32 {
    (v << 8) | u32::from(data[p + 2])
}

#[inline]
fn slot(h: u32) -> usize {
    ((h >> (3 * 8 - HLOG)).wrapping_sub(h) as usize) & (HSIZE - 1)
}

/// Write the control byte of the literal run that ends at `op`, or give
/// back the reserved byte if the run is empty.
#[inline]
fn close_run(output: &mut [u8], op: &mut usize, lit: usize) {
    if lit == 0 {
        *op -= 1;
    } else {
        output[*op - lit - 1] = (lit - 1) as u8;
    }
}

/// Compress `input` into `output`, returning the number of bytes written.
///
/// Fails with `OutputTooSmall` as soon as the encoding cannot fit. An empty
/// input compresses to zero bytes.
pub fn compress(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let in_len = input.len();
    let out_len = output.len();
    if in_len == 0 {
        return Ok(0);
    }
    if out_len == 0 {
        return Err(LzfError::OutputTooSmall);
    }

    let mut htab = vec![EMPTY; HSIZE];
    let mut ip = 0;
    // output[0] is reserved for the first run's control byte
    let mut op = 1;
    let mut lit = 0;

    let mut hval = if in_len > 2 { first(input, 0) } else { 0 };
    while ip + 2 < in_len {
        hval = next(hval, input, ip);
        let idx = slot(hval);
        let r = htab[idx];
        htab[idx] = ip;

        let is_match = r != EMPTY
            && r < ip
            && ip - r - 1 < MAX_OFF
            && input[r + 2] == input[ip + 2]
            && input[r] == input[ip]
            && input[r + 1] == input[ip + 1];

        if !is_match {
            if op >= out_len {
                return Err(LzfError::OutputTooSmall);
            }
            output[op] = input[ip];
            op += 1;
            ip += 1;
            lit += 1;
            if lit == MAX_LIT {
                close_run(output, &mut op, lit);
                lit = 0;
                op += 1;
            }
            continue;
        }

        let off = ip - r - 1;
        let maxlen = (in_len - ip - 2).min(MAX_REF);

        // up to three reference bytes plus the next run's control byte
        if op - usize::from(lit == 0) + 3 + 1 >= out_len {
            return Err(LzfError::OutputTooSmall);
        }
        close_run(output, &mut op, lit);

        // the first three bytes are known to match
        let mut len = 2;
        loop {
            len += 1;
            if len >= maxlen || input[r + len] != input[ip + len] {
                break;
            }
        }

        // stored as octets - 2
        len -= 2;
        ip += 1;

        if len < 7 {
            output[op] = ((off >> 8) + (len << 5)) as u8;
            op += 1;
        } else {
            output[op] = ((off >> 8) + (7 << 5)) as u8;
            output[op + 1] = (len - 7) as u8;
            op += 2;
        }
        output[op] = off as u8;
        op += 1;

        lit = 0;
        op += 1;

        ip += len + 1;
        if ip + 2 >= in_len {
            break;
        }

        // hash the last two positions of the match so later data can
        // refer back into it
        ip -= 2;
        hval = first(input, ip);
        hval = next(hval, input, ip);
        htab[slot(hval)] = ip;
        ip += 1;
        hval = next(hval, input, ip);
        htab[slot(hval)] = ip;
        ip += 1;
    }

    // at most two input bytes and one control byte remain
    if op + 3 > out_len {
        return Err(LzfError::OutputTooSmall);
    }

    while ip < in_len {
        output[op] = input[ip];
        op += 1;
        ip += 1;
        lit += 1;
        if lit == MAX_LIT {
            close_run(output, &mut op, lit);
            lit = 0;
            op += 1;
        }
    }
    close_run(output, &mut op, lit);

    Ok(op)
}
