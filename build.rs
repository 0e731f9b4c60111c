fn main() {
    // Only target builds need the ESP-IDF environment exported; host builds
    // (tests, simulation) have nothing to generate.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
