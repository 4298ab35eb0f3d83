fn main() {
    // Compile Slint UI files for the desktop binary
    #[cfg(feature = "desktop")]
    slint_build::compile("ui/main.slint").unwrap();
}
