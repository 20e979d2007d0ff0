//! DER and PEM decoding into the lintable wrappers.

use crate::model::{ParsedCertificate, ParsedCrl, ParsedOcspResponse};
use der::asn1::ObjectIdentifier;
use der::Decode;
use thiserror::Error;
use x509_cert::crl::CertificateList;
use x509_cert::Certificate;
use x509_ocsp::{BasicOcspResponse, OcspResponse, OcspResponseStatus};

/// id-pkix-ocsp-basic (RFC 6960 §4.2.1).
pub const ID_PKIX_OCSP_BASIC: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.48.1.1");

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("DER decoding failed: {0}")]
    Der(#[from] der::Error),

    #[error("PEM decoding failed: {message}")]
    Pem { message: String },

    #[error("Expected PEM label '{expected}', found '{found}'")]
    UnexpectedLabel { expected: &'static str, found: String },

    #[error("OCSP response status is {status}, not successful")]
    UnsuccessfulOcsp { status: String },

    #[error("OCSP response carries no response bytes")]
    MissingResponseBytes,

    #[error("Unsupported OCSP response type {oid}")]
    UnsupportedResponseType { oid: ObjectIdentifier },
}

pub fn decode_certificate(der: &[u8]) -> Result<ParsedCertificate, DecodeError> {
    Ok(ParsedCertificate(Certificate::from_der(der)?))
}

pub fn decode_certificate_pem(pem: &str) -> Result<ParsedCertificate, DecodeError> {
    decode_certificate(&pem_body(pem, "CERTIFICATE")?)
}

pub fn decode_revocation_list(der: &[u8]) -> Result<ParsedCrl, DecodeError> {
    Ok(ParsedCrl(CertificateList::from_der(der)?))
}

pub fn decode_revocation_list_pem(pem: &str) -> Result<ParsedCrl, DecodeError> {
    decode_revocation_list(&pem_body(pem, "X509 CRL")?)
}

/// Decode a full `OCSPResponse` and unwrap its basic response. Only
/// successful responses of type id-pkix-ocsp-basic can be linted.
pub fn decode_ocsp_response(der: &[u8]) -> Result<ParsedOcspResponse, DecodeError> {
    let response = OcspResponse::from_der(der)?;
    if !matches!(response.response_status, OcspResponseStatus::Successful) {
        return Err(DecodeError::UnsuccessfulOcsp {
            status: format!("{:?}", response.response_status),
        });
    }
    let bytes = response
        .response_bytes
        .ok_or(DecodeError::MissingResponseBytes)?;
    if bytes.response_type != ID_PKIX_OCSP_BASIC {
        return Err(DecodeError::UnsupportedResponseType {
            oid: bytes.response_type,
        });
    }
    decode_basic_ocsp_response(bytes.response.as_bytes())
}

pub fn decode_basic_ocsp_response(der: &[u8]) -> Result<ParsedOcspResponse, DecodeError> {
    Ok(ParsedOcspResponse(BasicOcspResponse::from_der(der)?))
}

fn pem_body(pem: &str, expected: &'static str) -> Result<Vec<u8>, DecodeError> {
    let (label, body) =
        pem_rfc7468::decode_vec(pem.as_bytes()).map_err(|e| DecodeError::Pem {
            message: e.to_string(),
        })?;
    if label != expected {
        return Err(DecodeError::UnexpectedLabel {
            expected,
            found: label.to_string(),
        });
    }
    Ok(body)
}
