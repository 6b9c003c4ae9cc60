//! # Precession, nutation and obliquity
//!
//! Rotation matrices between the J2000 mean equator and equinox and the true equator and
//! equinox of date, following the classical IAU 1976 precession and IAU 1980 nutation models.
//!
//! All polynomials take `T`, the Julian centuries of TDB since J2000.0
//! (see [`centuries_since_j2000`](crate::time::centuries_since_j2000)).
//! The matrices are written as explicit entries so that they reproduce, bit for bit, the
//! products of sines and cosines of the model angles.

use nalgebra::Matrix3;

use crate::constants::{Radian, DPI, RADSEC};

/// Classical precession angles ζ, z and θ, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecessionAngles {
    pub zeta: Radian,
    pub z: Radian,
    pub theta: Radian,
}

/// Compute the IAU 1976 precession angles for `t` Julian centuries since J2000.0.
///
/// Arguments
/// ---------
/// * `t`: Julian centuries of TDB since J2000.0.
///
/// Returns
/// --------
/// * The three angles, each of the form `RADSEC·(c1 + (c2 + c3·T)·T)·T`:
///
/// ```text
/// ζ = (2306.2181 + (0.30188 + 0.017998·T)·T)·T   [arcsec]
/// z = (2306.2181 + (1.09468 + 0.018203·T)·T)·T   [arcsec]
/// θ = (2004.3109 − (0.42665 + 0.041833·T)·T)·T   [arcsec]
/// ```
pub fn precession_angles(t: f64) -> PrecessionAngles {
    PrecessionAngles {
        zeta: RADSEC * (2306.2181 + (0.30188 + 0.017998 * t) * t) * t,
        z: RADSEC * (2306.2181 + (1.09468 + 0.018203 * t) * t) * t,
        theta: RADSEC * (2004.3109 - (0.42665 + 0.041833 * t) * t) * t,
    }
}

/// Compute the precession matrix from J2000 to the mean equator and equinox of date.
///
/// The matrix is the composition `R_z(−z)·R_y(θ)·R_z(−ζ)` (frame rotations), written out
/// as nine explicit products of the sines and cosines of [`precession_angles`].
///
/// Arguments
/// ---------
/// * `t`: Julian centuries of TDB since J2000.0.
///
/// Returns
/// --------
/// * `P` such that `x_mean_of_date = P · x_J2000`.
///
/// # See also
/// * [`precession_nutation_matrix`] – applies nutation after this matrix
/// * [`precess_coordinates`] – the same transformation on spherical coordinates
pub fn precession_matrix(t: f64) -> Matrix3<f64> {
    let PrecessionAngles { zeta, z, theta } = precession_angles(t);
    let (sse, cse) = zeta.sin_cos();
    let (sth, cth) = theta.sin_cos();
    let (sz, cz) = z.sin_cos();

    Matrix3::new(
        cse * cth * cz - sse * sz,
        -(cth * cz * sse + cse * sz),
        -(cz * sth),
        cz * sse + cse * cth * sz,
        cse * cz - cth * sse * sz,
        -(sth * sz),
        cse * sth,
        -(sse * sth),
        cth,
    )
}

/// Compute the mean obliquity of the ecliptic (IAU 1976).
///
/// ```text
/// ε₀ = RADSEC · (84381.448 − (46.8150 + (0.00059 − 0.001813·T)·T)·T)
/// ```
pub fn mean_obliquity(t: f64) -> Radian {
    RADSEC * (84381.448 - (46.8150 + (0.00059 - 0.001813 * t) * t) * t)
}

/// Build the nutation matrix from the mean to the true equator and equinox of date.
///
/// The entries mix the mean obliquity `ε₀` and the true obliquity `ε = ε₀ + Δε`:
/// they are the expansion of `R_x(−ε)·R_z(−Δψ)·R_x(ε₀)`.
///
/// Arguments
/// ---------
/// * `eps0`: mean obliquity of date [rad].
/// * `dpsi`: nutation in longitude Δψ [rad].
/// * `deps`: nutation in obliquity Δε [rad].
///
/// Returns
/// --------
/// * `N` such that `x_true = N · x_mean`.
pub fn nutation_matrix(eps0: Radian, dpsi: Radian, deps: Radian) -> Matrix3<f64> {
    let eps = eps0 + deps;
    let (sdp, cdp) = dpsi.sin_cos();
    let (sep, cep) = eps.sin_cos();
    let (se0, ce0) = eps0.sin_cos();

    Matrix3::new(
        cdp,
        -(sdp * ce0),
        -(sdp * se0),
        sdp * cep,
        cdp * cep * ce0 + sep * se0,
        cdp * cep * se0 - sep * ce0,
        sdp * sep,
        cdp * sep * ce0 - cep * se0,
        cdp * sep * se0 + cep * ce0,
    )
}

/// Combined precession-nutation matrix `N · P`, J2000 mean → true of date.
///
/// The product is order-sensitive: nutation is applied after precession.
///
/// # See also
/// * [`precession_matrix`]
/// * [`nutation_matrix`]
pub fn precession_nutation_matrix(t: f64, dpsi: Radian, deps: Radian) -> Matrix3<f64> {
    nutation_matrix(mean_obliquity(t), dpsi, deps) * precession_matrix(t)
}

/// Compute the nutation angles in longitude and obliquity using the IAU 1980 (Wahr) model.
///
/// This is the nutation source used when an ephemeris provider does not tabulate nutations
/// itself (see [`EphemerisProvider::nutation_angles`](crate::ephemeris::EphemerisProvider::nutation_angles)).
///
/// Arguments
/// ---------
/// * `t`: Julian centuries of TDB since J2000.0.
///
/// Returns
/// --------
/// * A tuple `(Δψ, Δε)` in radians.
///
/// Description
/// -----------
/// The angles are sums of periodic terms depending on five fundamental arguments, each a
/// cubic polynomial in `T`: the mean anomalies of the Moon (l) and of the Sun (p), the
/// argument of latitude of the Moon (f), the mean elongation of the Moon (d) and the
/// longitude of the Moon's ascending node (n). The series coefficients are in 0.0001″.
pub fn nutation_iau1980(t: f64) -> (Radian, Radian) {
    let t2 = t * t;
    let t3 = t2 * t;

    let dl = (485866.733 + 1717915922.633 * t + 31.310 * t2 + 0.064 * t3) * RADSEC;
    let dp = (1287099.804 + 129596581.224 * t - 0.577 * t2 - 0.012 * t3) * RADSEC;
    let df = (335778.877 + 1739527263.137 * t - 13.257 * t2 + 0.011 * t3) * RADSEC;
    let dd = (1072261.307 + 1602961601.328 * t - 6.891 * t2 + 0.019 * t3) * RADSEC;
    let dn = (450160.280 - 6962890.539 * t + 7.455 * t2 + 0.008 * t3) * RADSEC;

    let l = dl % DPI;
    let p = dp % DPI;
    let x = df % DPI * 2.0;
    let d = dd % DPI;
    let n = dn % DPI;

    let sin_cos = |x: f64| -> (f64, f64) { (x.cos(), x.sin()) };

    let (cl, sl) = sin_cos(l);
    let (cp, sp) = sin_cos(p);
    let (cx, sx) = sin_cos(x);
    let (cd, sd) = sin_cos(d);
    let (cn, sn) = sin_cos(n);

    // Construct compound trigonometric terms used in the series expansion
    let cp2 = 2.0 * cp * cp - 1.0;

    let sp2 = 2.0 * sp * cp;
    let cd2 = 2.0 * cd * cd - 1.0;
    let sd2 = 2.0 * sd * cd;
    let cn2 = 2.0 * cn * cn - 1.0;
    let sn2 = 2.0 * sn * cn;
    let cl2 = 2.0 * cl * cl - 1.0;
    let sl2 = 2.0 * sl * cl;

    let ca = cx * cd2 + sx * sd2;
    let sa = sx * cd2 - cx * sd2;
    let cb = ca * cn - sa * sn;
    let sb = sa * cn + ca * sn;
    let cc = cb * cn - sb * sn;
    let sc = sb * cn + cb * sn;

    let cv = cx * cd2 - sx * sd2;
    let sv = sx * cd2 + cx * sd2;
    let ce = cv * cn - sv * sn;
    let se = sv * cn + cv * sn;
    let cf = ce * cn - se * sn;
    let sf = se * cn + ce * sn;

    let cg = cl * cd2 + sl * sd2;
    let sg = sl * cd2 - cl * sd2;
    let ch = cx * cn2 - sx * sn2;
    let sh = sx * cn2 + cx * sn2;
    let cj = ch * cl - sh * sl;
    let sj = sh * cl + ch * sl;

    let ck = cj * cl - sj * sl;
    let sk = sj * cl + cj * sl;
    let cm = cx * cl2 + sx * sl2;
    let sm = sx * cl2 - cx * sl2;
    let cq = cl * cd + sl * sd;
    let sq = sl * cd - cl * sd;

    let cr = 2.0 * cq * cq - 1.0;
    let sr = 2.0 * sq * cq;
    let cs = cx * cn - sx * sn;
    let ss = sx * cn + cx * sn;
    let ct = cs * cl - ss * sl;
    let st = ss * cl + cs * sl;

    let cu = cf * cl + sf * sl;
    let su = sf * cl - cf * sl;
    let cw = cp * cg - sp * sg;
    let sw = sp * cg + cp * sg;

    // Series expansion for nutation in longitude (Δψ), in 0.0001 arcseconds
    let mut dpsi =
        -(171996.0 + 174.2 * t) * sn + (2062.0 + 0.2 * t) * sn2 + 46.0 * (sm * cn + cm * sn)
            - 11.0 * sm
            - 3.0 * (sm * cn2 + cm * sn2)
            - 3.0 * (sq * cp - cq * sp)
            - 2.0 * (sb * cp2 - cb * sp2)
            + (sn * cm - cn * sm)
            - (13187.0 + 1.6 * t) * sc
            + (1426.0 - 3.4 * t) * sp
            - (517.0 - 1.2 * t) * (sc * cp + cc * sp)
            + (217.0 - 0.5 * t) * (sc * cp - cc * sp)
            + (129.0 + 0.1 * t) * sb
            + 48.0 * sr
            - 22.0 * sa
            + (17.0 - 0.1 * t) * sp2
            - 15.0 * (sp * cn + cp * sn)
            - (16.0 - 0.1 * t) * (sc * cp2 + cc * sp2)
            - 12.0 * (sn * cp - cn * sp);

    dpsi += -6.0 * (sn * cr - cn * sr) - 5.0 * (sb * cp - cb * sp)
        + 4.0 * (sr * cn + cr * sn)
        + 4.0 * (sb * cp + cb * sp)
        - 4.0 * sq
        + (sr * cp + cr * sp)
        + (sn * ca - cn * sa)
        - (sp * ca - cp * sa)
        + (sp * cn2 + cp * sn2)
        + (sn * cq - cn * sq)
        - (sp * ca + cp * sa)
        - (2274.0 + 0.2 * t) * sh
        + (712.0 + 0.1 * t) * sl
        - (386.0 + 0.4 * t) * ss
        - 301.0 * sj
        - 158.0 * sg
        + 123.0 * (sh * cl - ch * sl)
        + 63.0 * sd2
        + (63.0 + 0.1 * t) * (sl * cn + cl * sn)
        - (58.0 + 0.1 * t) * (sn * cl - cn * sl)
        - 59.0 * su
        - 51.0 * st
        - 38.0 * sf
        + 29.0 * sl2;

    dpsi += 29.0 * (sc * cl + cc * sl) - 31.0 * sk
        + 26.0 * sx
        + 21.0 * (ss * cl - cs * sl)
        + 16.0 * (sn * cg - cn * sg)
        - 13.0 * (sn * cg + cn * sg)
        - 10.0 * (se * cl - ce * sl)
        - 7.0 * (sg * cp + cg * sp)
        + 7.0 * (sh * cp + ch * sp)
        - 7.0 * (sh * cp - ch * sp)
        - 8.0 * (sf * cl + cf * sl)
        + 6.0 * (sl * cd2 + cl * sd2)
        + 6.0 * (sc * cl2 + cc * sl2)
        - 6.0 * (sn * cd2 + cn * sd2)
        - 7.0 * se
        + 6.0 * (sb * cl + cb * sl)
        - 5.0 * (sn * cd2 - cn * sd2)
        + 5.0 * (sl * cp - cl * sp)
        - 5.0 * (ss * cl2 + cs * sl2)
        - 4.0 * (sp * cd2 - cp * sd2);

    dpsi += 4.0 * (sl * cx - cl * sx) - 4.0 * sd - 3.0 * (sl * cp + cl * sp)
        + 3.0 * (sl * cx + cl * sx)
        - 3.0 * (sj * cp - cj * sp)
        - 3.0 * (su * cp - cu * sp)
        - 2.0 * (sn * cl2 - cn * sl2)
        - 3.0 * (sk * cl + ck * sl)
        - 3.0 * (sf * cp - cf * sp)
        + 2.0 * (sj * cp + cj * sp)
        - 2.0 * (sb * cl - cb * sl);

    dpsi += 2.0 * (sn * cl2 + cn * sl2) - 2.0 * (sl * cn2 + cl * sn2)
        + 2.0 * (sl * cl2 + cl * sl2)
        + 2.0 * (sh * cd + ch * sd)
        + (sn2 * cl - cn2 * sl)
        - (sg * cd2 - cg * sd2)
        + (sf * cl2 - cf * sl2)
        - 2.0 * (su * cd2 + cu * sd2)
        - (sr * cd2 - cr * sd2)
        + (sw * ch + cw * sh)
        - (sl * ce + cl * se)
        - (sf * cr - cf * sr)
        + (su * ca + cu * sa)
        + (sg * cp - cg * sp)
        + (sb * cl2 + cb * sl2)
        - (sf * cl2 + cf * sl2)
        - (st * ca - ct * sa)
        + (sc * cx + cc * sx)
        + (sj * cr + cj * sr)
        - (sg * cx + cg * sx);

    dpsi += (sp * cs + cp * ss) + (sn * cw - cn * sw)
        - (sn * cx - cn * sx)
        - (sh * cd - ch * sd)
        - (sp * cd2 + cp * sd2)
        - (sl * cv - cl * sv)
        - (ss * cp - cs * sp)
        - (sw * cn + cw * sn)
        - (sl * ca - cl * sa)
        + (sl2 * cd2 + cl2 * sd2)
        - (sf * cd2 + cf * sd2)
        + (sp * cd + cp * sd);

    // Series expansion for nutation in obliquity (Δε), in 0.0001 arcseconds
    let mut deps = (92025.0 + 8.9 * t) * cn - (895.0 - 0.5 * t) * cn2 - 24.0 * (cm * cn - sm * sn)
        + (cm * cn2 - sm * sn2)
        + (cb * cp2 + sb * sp2)
        + (5736.0 - 3.1 * t) * cc
        + (54.0 - 0.1 * t) * cp
        + (224.0 - 0.6 * t) * (cc * cp - sc * sp)
        - (95.0 - 0.3 * t) * (cc * cp + sc * sp)
        - 70.0 * cb
        + cr
        + 9.0 * (cp * cn - sp * sn)
        + 7.0 * (cc * cp2 - sc * sp2)
        + 6.0 * (cn * cp + sn * sp)
        + 3.0 * (cn * cr + sn * sr)
        + 3.0 * (cb * cp + sb * sp)
        - 2.0 * (cr * cn - sr * sn)
        - 2.0 * (cb * cp - sb * sp);

    deps += (977.0 - 0.5 * t) * ch - 7.0 * cl + 200.0 * cs + (129.0 - 0.1 * t) * cj
        - cg
        - 53.0 * (ch * cl + sh * sl)
        - 2.0 * cd2
        - 33.0 * (cl * cn - sl * sn)
        + 32.0 * (cn * cl + sn * sl)
        + 26.0 * cu
        + 27.0 * ct
        + 16.0 * cf
        - cl2
        - 12.0 * (cc * cl - sc * sl)
        + 13.0 * ck
        - cx
        - 10.0 * (cs * cl + ss * sl)
        - 8.0 * (cn * cg + sn * sg)
        + 7.0 * (cn * cg - sn * sg)
        + 5.0 * (ce * cl + se * sl)
        - 3.0 * (ch * cp - sh * sp)
        + 3.0 * (ch * cp + sh * sp)
        + 3.0 * (cf * cl - sf * sl)
        - 3.0 * (cc * cl2 - sc * sl2)
        + 3.0 * (cn * cd2 - sn * sd2)
        + 3.0 * ce
        - 3.0 * (cb * cl - sb * sl)
        + 3.0 * (cn * cd2 + sn * sd2)
        + 3.0 * (cs * cl2 - ss * sl2)
        + (cj * cp + sj * sp)
        + (cu * cp + su * sp)
        + (cn * cl2 + sn * sl2)
        + (ck * cl - sk * sl)
        + (cf * cp + sf * sp)
        - (cj * cp - sj * sp)
        + (cb * cl + sb * sl)
        - (cn * cl2 - sn * sl2)
        + (cl * cn2 - sl * sn2)
        - (ch * cd - sh * sd)
        - (cn2 * cl + sn2 * sl)
        - (cf * cl2 + sf * sl2)
        + (cu * cd2 - su * sd2)
        - (cw * ch - sw * sh)
        + (cl * ce - sl * se)
        + (cf * cr + sf * sr)
        - (cb * cl2 - sb * sl2);

    // 0.0001″ → rad
    (dpsi * 1e-4 * RADSEC, deps * 1e-4 * RADSEC)
}

/// Equation of the equinoxes `Δψ·cos ε₀`, the difference between apparent and mean
/// sidereal time, in radians.
pub fn equation_of_equinoxes(t: f64, dpsi: Radian) -> Radian {
    dpsi * mean_obliquity(t).cos()
}

/// Precess right ascension and declination from J2000 to the mean equinox of `t`.
///
/// This works directly on spherical coordinates, for callers that only hold angles:
///
/// ```text
/// δ = asin(cos(α₀+ζ)·sin θ·cos δ₀ + cos θ·sin δ₀)
/// α = z + atan2(sin(α₀+ζ)·cos δ₀, cos(α₀+ζ)·cos θ·cos δ₀ − sin θ·sin δ₀)
/// ```
///
/// Arguments
/// ---------
/// * `t`: Julian centuries of TDB since J2000.0 (negative for earlier epochs such as B1950).
/// * `ra0`, `dec0`: J2000 right ascension and declination [rad].
///
/// Returns
/// --------
/// * `(α, δ)` with α in [0, 2π).
///
/// # See also
/// * [`precess_coordinates_inverse`] – the reverse transformation
/// * [`precession_matrix`] – the equivalent rotation on vectors
pub fn precess_coordinates(t: f64, ra0: Radian, dec0: Radian) -> (Radian, Radian) {
    let PrecessionAngles { zeta, z, theta } = precession_angles(t);
    let (sd0, cd0) = dec0.sin_cos();
    let (sth, cth) = theta.sin_cos();
    let (sa, ca) = (ra0 + zeta).sin_cos();

    let dec = (ca * sth * cd0 + cth * sd0).clamp(-1.0, 1.0).asin();
    let ra = z + (sa * cd0).atan2(ca * cth * cd0 - sth * sd0);

    (ra.rem_euclid(DPI), dec)
}

/// Precess right ascension and declination from the mean equinox of `t` back to J2000.
///
/// ```text
/// δ₀ = asin(−cos(α−z)·sin θ·cos δ + cos θ·sin δ)
/// α₀ = −ζ + atan2(sin(α−z)·cos δ, cos(α−z)·cos θ·cos δ + sin θ·sin δ)
/// ```
pub fn precess_coordinates_inverse(t: f64, ra: Radian, dec: Radian) -> (Radian, Radian) {
    let PrecessionAngles { zeta, z, theta } = precession_angles(t);
    let (sd, cd) = dec.sin_cos();
    let (sth, cth) = theta.sin_cos();
    let (sa, ca) = (ra - z).sin_cos();

    let dec0 = (-ca * sth * cd + cth * sd).clamp(-1.0, 1.0).asin();
    let ra0 = -zeta + (sa * cd).atan2(ca * cth * cd + sth * sd);

    (ra0.rem_euclid(DPI), dec0)
}
