/*! Bounded byte streams over raw process memory.

A region of memory, identified by a raw address and a length, is opened
like a file: it can be read and written sequentially or at an offset,
seeked within its bounds, queried for its size and closed again.

The address travels as a textual buffer specification of the form
`ffi.memory://0x<hex-address>;<size>`, which is what lets a generic
stream dispatcher route an open request to this crate.

# Usage examples

```
use std::io::Read;
use memstream::wrapper::memory_open;

let mut data = *b"0123456789";
let mut stream = unsafe { memory_open(data.as_mut_ptr(), "r", data.len() as u64) }.unwrap();

let mut head = [0u8; 5];
stream.read_exact(&mut head).unwrap();
assert_eq!(&head, b"01234");
```

*/

#![warn(missing_docs)]
pub mod codec;
#[cfg(feature = "internal_ffi")]
pub mod ffi;
pub mod stream;
pub mod wrapper;

pub mod constants;
pub(crate) mod raw;
