/*!
bit tricks for texture storage sizes.
*/

/**
Smallest power of two that is >= `n`.

Zero stays zero, so an empty texture has empty storage.

```
# use sprites_and_glyphs::power_of_two;
assert_eq!(power_of_two(0), 0);
assert_eq!(power_of_two(1), 1);
assert_eq!(power_of_two(100), 128);
assert_eq!(power_of_two(256), 256);
```
*/
pub fn power_of_two(n: u32) -> u32 {
    if n == 0 {
        0
    } else {
        n.next_power_of_two()
    }
}
